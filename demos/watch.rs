// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Monitors a set of lines for edges from a single thread.

use gpio_chardev::{Chip, EdgeDetect, EventRequest, EventWatcher, IoError};
use quicli::prelude::*;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// The gpiochip device (e.g. /dev/gpiochip0)
    chip: PathBuf,
    /// The offsets of the GPIO lines to monitor
    lines: Vec<u32>,
}

fn do_main(args: Cli) -> anyhow::Result<()> {
    let mut chip = Chip::open(&args.chip)?;

    // One event handle per line, tagged with its line number. The handles
    // outlive the chip fd.
    let mut handles = Vec::with_capacity(args.lines.len());
    for &line in &args.lines {
        let request = EventRequest::new(line, EdgeDetect::Both).consumer("watch")?;
        handles.push(chip.request_event(request)?);
    }
    chip.close()?;

    let mut watcher = EventWatcher::new()?;
    for handle in &handles {
        watcher.register(handle, handle.line_number())?;
    }

    loop {
        match watcher.wait(10_000) {
            Ok(Some(event)) => {
                let edge = if event.is_rising() { "rising" } else { "falling" };
                println!("[{}] {} at {}ns", event.tag(), edge, event.timestamp_ns());
            }
            Ok(None) => println!("no edges for ten seconds"),
            Err(IoError::LineError(tag)) => {
                eprintln!("[{tag}] error condition, dropping line");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args).or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
