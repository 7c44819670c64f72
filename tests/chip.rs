//! Kernel-facing scenarios.
//!
//! These tests need a chip whose lines are safe to drive, e.g. one created
//! by the `gpio-sim` kernel module. Point `GPIO_CHARDEV_TEST_CHIP` at its
//! device node to enable them; without the variable they pass vacuously so
//! the suite can run on machines with no GPIO hardware at all.

use gpio_chardev::{Chip, EdgeDetect, EventRequest, HandleRequest, LineBuffer, LineOptions};

fn test_chip() -> Option<Chip> {
    let path = std::env::var("GPIO_CHARDEV_TEST_CHIP").ok()?;
    Some(Chip::open(path).expect("GPIO_CHARDEV_TEST_CHIP must point at an openable chip"))
}

#[test]
fn chip_reports_its_info() {
    let Some(chip) = test_chip() else { return };

    let info = chip.info().unwrap();
    assert!(info.num_lines() > 0);
    assert!(info.name().is_some());
}

#[test]
fn output_handle_drives_and_reads_back_three_lines() {
    let Some(mut chip) = test_chip() else { return };

    let mut request = HandleRequest::new(LineOptions::output());
    request.set_consumer("gpio-chardev-test").unwrap();
    let first = request.add_line_with_default(17, false).unwrap();
    let second = request.add_line_with_default(27, false).unwrap();
    let third = request.add_line_with_default(22, false).unwrap();
    let handle = chip.request_handle(request).unwrap();

    // The handle stays valid across the chip closing.
    chip.close().unwrap();

    let mut buffer = LineBuffer::new();
    buffer.set(first, true).set(second, true).set(third, true);
    handle.write(&buffer).unwrap();

    let readback = handle.read().unwrap();
    assert!(readback.get(first));
    assert!(readback.get(second));
    assert!(readback.get(third));

    buffer.clear();
    handle.write(&buffer).unwrap();

    let readback = handle.read().unwrap();
    assert!(!readback.get(first));
    assert!(!readback.get(second));
    assert!(!readback.get(third));
}

#[test]
fn requesting_a_held_line_reports_busy() {
    let Some(chip) = test_chip() else { return };

    let mut request = HandleRequest::new(LineOptions::input());
    request.set_consumer("gpio-chardev-test-holder").unwrap();
    request.add_line(5).unwrap();
    let _held = chip.request_handle(request).unwrap();

    let mut second = HandleRequest::new(LineOptions::input());
    second.add_line(5).unwrap();
    assert_eq!(
        chip.request_handle(second).err(),
        Some(gpio_chardev::IoError::LineBusy)
    );

    // The event request path sees the same conflict.
    let event = EventRequest::new(5, EdgeDetect::Both);
    assert_eq!(
        chip.request_event(event).err(),
        Some(gpio_chardev::IoError::LineBusy)
    );
}
