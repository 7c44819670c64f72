// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Clone of functionality of linux/tools/gpio/lsgpio.c

use gpio_chardev::chips;

fn main() {
    let chip_iterator = match chips() {
        Ok(chips) => chips,
        Err(e) => {
            println!("Failed to get chip iterator: {:?}", e);
            return;
        }
    };

    for chip in chip_iterator {
        let chip = match chip {
            Ok(chip) => chip,
            Err(e) => {
                eprintln!("chip error: {e}");
                continue;
            }
        };
        let info = match chip.info() {
            Ok(info) => info,
            Err(e) => {
                eprintln!("chip info error: {e}");
                continue;
            }
        };
        println!(
            "GPIO chip: \"{}\", \"{}\", {} GPIO Lines",
            info.name().unwrap_or("?"),
            info.label().unwrap_or("?"),
            info.num_lines()
        );

        for number in 0..info.num_lines().min(64) {
            let line = match chip.line_info(number) {
                Ok(line) => line,
                Err(e) => {
                    eprintln!("\tline {number:>3}: error {e}");
                    continue;
                }
            };

            let mut flags = vec![];

            if line.is_used() {
                flags.push("used");
            }
            if line.is_output() {
                flags.push("output");
            }
            if line.is_active_low() {
                flags.push("active-low");
            }
            if line.is_open_drain() {
                flags.push("open-drain");
            }
            if line.is_open_source() {
                flags.push("open-source");
            }

            let usage = if !flags.is_empty() {
                format!("[{}]", flags.join(" "))
            } else {
                "".to_owned()
            };

            println!(
                "\tline {number:>3}: {name} {consumer} {usage}",
                name = line.name().unwrap_or("unused"),
                consumer = line.consumer().unwrap_or("unused"),
            );
        }
        println!();
    }
}
