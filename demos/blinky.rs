// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Alternately blinks a pair of lines, the classic two-LED demo.

use gpio_chardev::{Chip, HandleRequest, LineBuffer, LineOptions};
use quicli::prelude::*;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::{Duration, Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// The gpiochip device (e.g. /dev/gpiochip0)
    chip: PathBuf,
    /// The offset of the first GPIO line
    line_a: u32,
    /// The offset of the second GPIO line
    line_b: u32,
    /// Period in milliseconds
    period_ms: u64,
    /// Duration over which to blink in milliseconds
    duration_ms: u64,
}

fn do_main(args: Cli) -> anyhow::Result<()> {
    let mut chip = Chip::open(&args.chip)?;

    let mut request = HandleRequest::new(LineOptions::output());
    request.set_consumer("blinky")?;
    let a = request.add_line_with_default(args.line_a, true)?;
    let b = request.add_line_with_default(args.line_b, false)?;
    let handle = chip.request_handle(request)?;

    // The handle keeps the lines; the chip fd is no longer needed.
    chip.close()?;

    let mut buffer = LineBuffer::new();
    buffer.set(a, true).set(b, false);

    let duration = Duration::from_millis(args.duration_ms);
    let start_time = Instant::now();
    while start_time.elapsed() < duration {
        sleep(Duration::from_millis(args.period_ms));
        buffer.toggle(a).toggle(b);
        handle.write(&buffer)?;
    }

    buffer.clear();
    handle.write(&buffer)?;

    Ok(())
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args).or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
