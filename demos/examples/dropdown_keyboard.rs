// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard walk through a dropdown with a nested submenu.
//!
//! This example shows how a host wires:
//! - `understory_disclosure::Disclosure` to toggle clicks and key presses,
//! - `understory_root_close::ListenerRegistry` to document-level events,
//! - a `ListenerHost` that would attach real document listeners.
//!
//! Run:
//! - `cargo run -p understory_demos --example dropdown_keyboard`

use std::cell::RefCell;
use std::rc::Rc;

use understory_disclosure::{Disclosure, DisclosureParts, DisclosureProps, PartRole, Role};
use understory_dom::{Dom, EventKind, Key, MemoryDom, NodeFlags, NodeId, UiEvent};
use understory_root_close::{ListenerHost, ListenerRegistry};

/// Prints what a browser host would do with its document listeners.
struct PrintingHost;

impl ListenerHost for PrintingHost {
    fn attach(&mut self, kind: EventKind) {
        println!("  [document] addEventListener({kind:?})");
    }

    fn detach(&mut self, kind: EventKind) {
        println!("  [document] removeEventListener({kind:?})");
    }
}

fn menu(dom: &mut MemoryDom, parent: NodeId, items: usize) -> (NodeId, NodeId, NodeId) {
    let root = dom.insert(Some(parent), NodeFlags::empty());
    let toggle = dom.insert(Some(root), NodeFlags::CONTROL);
    let menu = dom.insert(Some(root), NodeFlags::empty());
    for _ in 0..items {
        dom.insert(Some(menu), NodeFlags::MENU_ITEM);
    }
    (root, toggle, menu)
}

fn main() {
    let mut dom = MemoryDom::new();
    let body = dom.create_root();
    let elsewhere = dom.insert(Some(body), NodeFlags::CONTROL);
    let (file_root, file_toggle, file_menu) = menu(&mut dom, body, 3);
    let (recent_root, recent_toggle, recent_menu) = menu(&mut dom, file_menu, 2);

    let registry = ListenerRegistry::with_host(PrintingHost);
    let requests = Rc::new(RefCell::new(Vec::new()));

    let parts = DisclosureParts::from_children(
        file_root,
        [(file_toggle, PartRole::Toggle), (file_menu, PartRole::Menu)],
    )
    .expect("file menu structure");
    let sink = requests.clone();
    let mut file = Disclosure::new(
        DisclosureProps {
            id: Some("file".into()),
            ..DisclosureProps::default()
        },
        parts,
        registry.clone(),
    )
    .with_notifier(move |open, _, details| sink.borrow_mut().push(("file", open, details.source)));

    let sink = requests.clone();
    let mut recent = Disclosure::new(
        DisclosureProps {
            id: Some("recent".into()),
            role: Role::MenuItem,
            ..DisclosureProps::default()
        },
        DisclosureParts::new(recent_root, recent_toggle, recent_menu),
        registry.clone(),
    )
    .with_notifier(move |open, _, details| sink.borrow_mut().push(("recent", open, details.source)));

    file.mount(&mut dom);
    recent.mount(&mut dom);
    dom.focus(file_toggle).expect("toggle is focusable");

    println!("== ArrowDown on the File toggle ==");
    let mut key = UiEvent::key_down(file_toggle, Key::ArrowDown);
    file.handle_keydown(&mut dom, &mut key);
    println!("  open={} focus={:?} classes={:?}", file.is_open(), dom.active_element(), file.root_classes());

    println!("\n== ArrowUp wraps to the last item ==");
    let mut key = UiEvent::key_down(dom.active_element().unwrap_or(file_toggle), Key::ArrowUp);
    file.handle_keydown(&mut dom, &mut key);
    println!("  focus={:?}", dom.active_element());

    println!("\n== Open the Recent submenu ==");
    recent.handle_click(&mut dom, &UiEvent::click(recent_toggle));
    println!("  recent open={} focus={:?}", recent.is_open(), dom.active_element());

    println!("\n== Click elsewhere: only the submenu closes ==");
    let mut click = UiEvent::click(elsewhere);
    let delivery = registry.dispatch(&mut click, &dom);
    println!("  delivery={delivery:?}");
    for d in [&mut file, &mut recent] {
        d.handle_delivery(&mut dom, &click, &delivery);
    }
    println!("  file open={} recent open={}", file.is_open(), recent.is_open());

    println!("\n== Escape closes File and returns focus ==");
    let mut key = UiEvent::key_down(dom.active_element().unwrap_or(file_toggle), Key::Escape);
    file.handle_keydown(&mut dom, &mut key);
    println!("  file open={} focus={:?}", file.is_open(), dom.active_element());

    println!("\n== Toggle requests ==");
    for (who, open, source) in requests.borrow().iter() {
        println!("  {who}: open={open} source={source:?}");
    }
    println!("  live listeners: {}", registry.attached_listener_count());
}
