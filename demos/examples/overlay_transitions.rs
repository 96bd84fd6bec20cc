// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover placement, transition timing and a modal's focus handling.
//!
//! This example shows:
//! - `Overlay` placement near a container edge (the arrow follows the shift),
//! - transition completion by transition-end or by timeout,
//! - `Modal` resize padding and focus restoration.
//!
//! Run:
//! - `cargo run -p understory_demos --example overlay_transitions`

use kurbo::{Rect, Size};
use understory_disclosure::{
    Modal, ModalMetrics, ModalOptions, Overlay, OverlayGeometry, OverlayOptions, Placement,
};
use understory_dom::{Dom, MemoryDom, NodeFlags, UiEvent};
use understory_root_close::ListenerRegistry;

fn main() {
    let mut dom = MemoryDom::new();
    let body = dom.create_root();
    let button = dom.insert(Some(body), NodeFlags::CONTROL);
    let popover = dom.insert(Some(body), NodeFlags::empty());
    let dialog = dom.insert(Some(body), NodeFlags::FOCUSABLE);
    let registry = ListenerRegistry::new();

    println!("== Popover above a button near the left edge ==");
    let mut overlay = Overlay::new(
        popover,
        button,
        OverlayOptions {
            root_close: true,
            placement: Placement::Top,
            ..OverlayOptions::default()
        },
        registry.clone(),
    );
    overlay.set_on_hide(|event| println!("  on_hide requested by {:?}", event.kind));
    let geometry = OverlayGeometry {
        target: Rect::new(4.0, 200.0, 44.0, 224.0),
        container: Rect::new(0.0, 0.0, 800.0, 600.0),
        overlay: Size::new(160.0, 60.0),
    };
    let events = overlay.show(&mut dom, &geometry, 0);
    println!("  events={events:?}");
    println!("  position={:?}", overlay.position());
    println!("  classes={:?}", overlay.classes());

    println!("\n== No transitionend arrives; the timeout completes the enter ==");
    for now in [100, 299, 300, 301] {
        println!("  poll({now}) -> {:?}", overlay.poll(&mut dom, now));
    }

    println!("\n== Outside click asks the owner to hide ==");
    let mut click = UiEvent::click(body);
    let delivery = registry.dispatch(&mut click, &dom);
    overlay.handle_delivery(&click, &delivery);
    let events = overlay.hide(&mut dom, 500);
    println!("  events={events:?} mounted={}", overlay.is_mounted());
    println!("  transitionend -> {:?}", overlay.on_transition_end(&mut dom, popover));
    println!("  mounted={}", overlay.is_mounted());

    println!("\n== Modal ==");
    dom.focus(button).expect("button is focusable");
    let mut modal = Modal::new(dialog, ModalOptions::default(), registry.clone());
    modal.set_on_hide(|_| println!("  modal on_hide"));
    let metrics = ModalMetrics {
        body_overflowing: true,
        dialog_scroll_height: 400.0,
        client_height: 600.0,
        scrollbar_size: 15.0,
    };
    let _ = modal.show(&mut dom, &metrics, 1_000);
    println!("  focus={:?} style={:?}", dom.active_element(), modal.style());
    println!("  backdrop click handled: {}", modal.handle_dialog_click(&UiEvent::click(dialog)));
    let _ = modal.hide(&mut dom, 1_100);
    println!("  resize listener while exiting: {}", modal.is_listening_for_resize());
    let _ = modal.poll(&mut dom, 1_400);
    println!("  after exit: focus={:?} resize listener={}", dom.active_element(), modal.is_listening_for_resize());
    println!("  live listeners: {}", registry.attached_listener_count());
}
