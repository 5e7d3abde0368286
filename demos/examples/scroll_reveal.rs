// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-triggered reveal.
//!
//! Mount five sections, scroll a 600px viewport down the page in steps, and
//! print which sections have been revealed after each step.
//!
//! Run:
//! - `cargo run -p understory_reveal_demos --example scroll_reveal`
//! - `RUST_LOG=understory_reveal=trace cargo run -p understory_reveal_demos --example scroll_reveal`
//! - append `-- --unsupported` to see the fallback for hosts without visibility detection.

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_reveal::{AttachOutcome, RevealConfig, RevealView, ViewportHost};
use understory_reveal_demos::{PAGE_WIDTH, mount_stacked, render};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let unsupported = std::env::args().any(|a| a == "--unsupported");

    let config = RevealConfig::default();
    let mut view = RevealView::new(config);
    let mut host = ViewportHost::new(Rect::new(0.0, 0.0, PAGE_WIDTH, 600.0), config.threshold());
    host.set_supported(!unsupported);

    mount_stacked(&mut view, &mut host);
    match view.did_mount(&mut host) {
        AttachOutcome::Fallback { revealed } => {
            println!("visibility detection unavailable; revealed {revealed} sections up front");
        }
        outcome => println!("mounted: {outcome:?}"),
    }

    for step in 0..6 {
        let batch = host.take_batch();
        let revealed = view.on_visibility(&batch);
        let viewport = host.viewport();
        println!(
            "\nstep {step}: viewport {:.0}..{:.0}, newly revealed {revealed:?}",
            viewport.y0, viewport.y1
        );
        print!("{}", render(&view, &host));
        host.scroll_by(300.0);
    }

    view.will_unmount(&mut host);
    println!("\nunmounted; {} handles still observed", host.observed_len());
}
