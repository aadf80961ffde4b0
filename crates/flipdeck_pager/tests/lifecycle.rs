//! Construction, listener binding and resize handling

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use flipdeck_pager::prelude::*;
use flipdeck_platform::testing::{ListenerChange, MemoryElement, MemoryHost};
use flipdeck_platform::{Capabilities, Host, InputEvent, ListenerTarget, NativeEvent, Size, Surface};

fn mount(count: usize, config: PageConfig) -> (Pager<MemoryHost>, MemoryElement) {
    let host = MemoryHost::new();
    let (wrapper, _) = host.mount_pages(count, Size::new(320.0, 568.0));
    let pager = Pager::new(
        host,
        ContainerSpec::Element(wrapper.clone()),
        SlideSpec::Children,
        config,
    )
    .unwrap();
    (pager, wrapper)
}

fn counter(pager: &Pager<MemoryHost>, event: PageEvent) -> Rc<RefCell<usize>> {
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    pager.on(event, move |_| *c.borrow_mut() += 1);
    count
}

#[test]
fn test_container_by_selector() {
    let host = MemoryHost::new();
    host.mount_pages(2, Size::new(320.0, 568.0));
    let pager = Pager::new(
        host,
        ContainerSpec::Selector(".pageWrap"),
        SlideSpec::Selector(".m-page"),
        PageConfig::default(),
    )
    .unwrap();
    assert_eq!(pager.page_count(), 2);
}

#[test]
fn test_body_container() {
    let host = MemoryHost::new();
    let slides: Vec<_> = (0..3).map(|_| MemoryElement::new("section")).collect();
    for slide in &slides {
        host.body().append_child(slide.clone());
    }
    let pager = Pager::new(
        host,
        ContainerSpec::Body,
        SlideSpec::Elements(slides),
        PageConfig::default(),
    )
    .unwrap();
    assert_eq!(pager.page_count(), 3);
    assert_eq!(pager.size(), Size::new(320.0, 568.0));
}

#[test]
fn test_missing_container() {
    let err = Pager::new(
        MemoryHost::new(),
        ContainerSpec::Selector(".nope"),
        SlideSpec::Children,
        PageConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, PagerError::ContainerNotFound(s) if s == ".nope"));
}

#[test]
fn test_unrenderable_container() {
    let host = MemoryHost::new();
    let (wrapper, _) = host.mount_pages(2, Size::new(320.0, 568.0));
    wrapper.set_renderable(false);
    let err = Pager::new(
        host,
        ContainerSpec::Element(wrapper),
        SlideSpec::Children,
        PageConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, PagerError::ContainerNotRenderable));
}

#[test]
fn test_no_slides() {
    let host = MemoryHost::new();
    let (wrapper, _) = host.mount_pages(2, Size::new(320.0, 568.0));
    let err = Pager::new(
        host,
        ContainerSpec::Element(wrapper),
        SlideSpec::Selector(".missing"),
        PageConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, PagerError::NoSlides));
}

#[test]
fn test_current_out_of_range() {
    let host = MemoryHost::new();
    let (wrapper, _) = host.mount_pages(2, Size::new(320.0, 568.0));
    let config = PageConfig {
        current: 2,
        ..Default::default()
    };
    let err = Pager::new(host, ContainerSpec::Element(wrapper), SlideSpec::Children, config)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        PagerError::CurrentOutOfRange { current: 2, len: 2 }
    ));
}

#[test]
fn test_invalid_config() {
    let host = MemoryHost::new();
    let (wrapper, _) = host.mount_pages(2, Size::new(320.0, 568.0));
    let config = PageConfig {
        move_y: 0.0,
        ..Default::default()
    };
    let err = Pager::new(host, ContainerSpec::Element(wrapper), SlideSpec::Children, config)
        .err()
        .unwrap();
    assert!(matches!(err, PagerError::Config(_)));
}

#[test]
fn test_initial_current() {
    let config = PageConfig {
        current: 2,
        ..Default::default()
    };
    let (pager, wrapper) = mount(3, config);
    assert_eq!(pager.page_now(), 2);
    let visible: Vec<_> = wrapper
        .children()
        .iter()
        .map(MemoryElement::is_visible)
        .collect();
    assert_eq!(visible, vec![false, false, true]);
}

#[test]
fn test_bound_at_construction() {
    let (pager, _) = mount(2, PageConfig::default());
    assert!(pager.is_bound());

    let host = pager.host();
    assert!(host.has_listener(ListenerTarget::Window, NativeEvent::Resize));
    assert!(host.has_listener(ListenerTarget::Window, NativeEvent::OrientationChange));
    assert!(host.has_listener(ListenerTarget::Container, NativeEvent::TouchStart));
    assert!(host.has_listener(ListenerTarget::Container, NativeEvent::MouseDown));
    assert!(host.has_listener(ListenerTarget::Slide(1), NativeEvent::WebkitTransitionEnd));
    assert!(!host.has_listener(ListenerTarget::Container, NativeEvent::PointerDown));
    // 2 window + 4 touch + 5 mouse + 2 * 4 transition end
    assert_eq!(host.listener_count(), 19);
}

#[test]
fn test_start_disabled_waits_for_bind() {
    let config = PageConfig {
        start_enabled: false,
        ..Default::default()
    };
    let (mut pager, _) = mount(3, config);
    assert!(!pager.is_bound());
    assert_eq!(pager.host().listener_count(), 0);

    let created = counter(&pager, PageEvent::Create);
    pager.bind();
    assert!(pager.is_bound());
    assert_eq!(*created.borrow(), 1);
    // 2 window + 4 touch + 5 mouse + 3 * 4 transition end
    assert_eq!(pager.host().listener_count(), 23);
}

#[test]
fn test_unbind_stops_input() {
    let (mut pager, _) = mount(3, PageConfig::default());
    let destroyed = counter(&pager, PageEvent::Destroy);
    let started = counter(&pager, PageEvent::Start);

    pager.unbind();
    assert!(!pager.is_bound());
    assert_eq!(*destroyed.borrow(), 1);
    assert_eq!(pager.host().listener_count(), 0);

    pager.handle_event(&InputEvent::touch(NativeEvent::TouchStart, 0.0, 300.0));
    assert_eq!(pager.state(), PagerState::Idle);
    assert_eq!(*started.borrow(), 0);

    // repeat calls emit again but do not touch the host twice
    pager.unbind();
    assert_eq!(*destroyed.borrow(), 2);
    let removed = pager
        .host()
        .listener_log()
        .iter()
        .filter(|c| matches!(c, ListenerChange::Removed(..)))
        .count();
    assert_eq!(removed, 23);
}

#[test]
fn test_unbind_completes_settle() {
    let (mut pager, wrapper) = mount(3, PageConfig::default());
    let succeeded = counter(&pager, PageEvent::Success);

    pager.handle_event(&InputEvent::touch(NativeEvent::TouchStart, 0.0, 400.0));
    pager.handle_event(&InputEvent::touch(NativeEvent::TouchMove, 0.0, 200.0));
    pager.handle_event(&InputEvent::touch(NativeEvent::TouchEnd, 0.0, 200.0));
    assert_eq!(pager.state(), PagerState::Settling);

    // the transition end can no longer be delivered
    pager.unbind();
    assert_eq!(pager.state(), PagerState::Idle);
    assert_eq!(pager.page_now(), 1);
    assert_eq!(pager.page_next(), None);
    assert_eq!(*succeeded.borrow(), 1);
    assert!(!wrapper.children()[0].is_visible());

    pager.bind();
    pager.handle_event(&InputEvent::touch(NativeEvent::TouchStart, 0.0, 300.0));
    assert_eq!(pager.state(), PagerState::Tracking);
}

#[test]
fn test_unbind_drops_unreleased_drag() {
    let (mut pager, wrapper) = mount(3, PageConfig::default());
    pager.handle_event(&InputEvent::touch(NativeEvent::TouchStart, 0.0, 400.0));
    pager.handle_event(&InputEvent::touch(NativeEvent::TouchMove, 0.0, 250.0));
    assert_eq!(pager.state(), PagerState::Locked);

    pager.unbind();
    assert_eq!(pager.state(), PagerState::Idle);
    assert_eq!(pager.page_now(), 0);
    let slides = wrapper.children();
    assert!(slides[0].is_visible());
    assert!(!slides[1].is_visible());
    assert_eq!(slides[1].style("transform"), None);
    assert_eq!(slides[1].z_index(), Some(8));

    pager.bind();
    pager.handle_event(&InputEvent::touch(NativeEvent::TouchStart, 0.0, 300.0));
    assert_eq!(pager.state(), PagerState::Tracking);
}

#[test]
fn test_rebind_after_unbind() {
    let (mut pager, _) = mount(2, PageConfig::default());
    pager.unbind();
    pager.bind();
    pager.bind();
    assert_eq!(pager.host().listener_count(), 19);

    pager.handle_event(&InputEvent::touch(NativeEvent::TouchStart, 0.0, 300.0));
    assert_eq!(pager.state(), PagerState::Tracking);
}

#[test]
fn test_families_follow_config_and_capabilities() {
    let host = MemoryHost::new().with_capabilities(Capabilities {
        touch: false,
        pointer: true,
        mouse: true,
    });
    let (wrapper, _) = host.mount_pages(2, Size::new(320.0, 568.0));
    let config = PageConfig {
        mouse: false,
        ..Default::default()
    };
    let mut pager =
        Pager::new(host, ContainerSpec::Element(wrapper), SlideSpec::Children, config).unwrap();

    let host = pager.host();
    assert!(host.has_listener(ListenerTarget::Container, NativeEvent::PointerDown));
    assert!(!host.has_listener(ListenerTarget::Container, NativeEvent::MouseDown));
    assert!(!host.has_listener(ListenerTarget::Container, NativeEvent::TouchStart));

    pager.handle_event(&InputEvent::at(NativeEvent::MouseDown, 0.0, 300.0));
    assert_eq!(pager.state(), PagerState::Idle);
    pager.handle_event(&InputEvent::at(NativeEvent::PointerDown, 0.0, 300.0));
    assert_eq!(pager.state(), PagerState::Tracking);
}

#[test]
fn test_resize_burst_refreshes_once() {
    let (mut pager, wrapper) = mount(3, PageConfig::default());
    let refreshed = counter(&pager, PageEvent::Refresh);
    let resized = counter(&pager, PageEvent::Resize);

    wrapper.set_rendered_size(Size::new(568.0, 320.0));
    let t0 = Instant::now();
    for i in 0..5u64 {
        let event = InputEvent::new(NativeEvent::Resize);
        pager.handle_event_at(&event, t0 + Duration::from_millis(10 * i));
    }
    assert_eq!(*resized.borrow(), 5);
    assert!(pager.resize_pending());
    assert_eq!(
        pager.resize_deadline(),
        Some(t0 + Duration::from_millis(100))
    );

    // last signal at +40ms, default debounce 60ms
    pager.tick_at(t0 + Duration::from_millis(99));
    assert_eq!(*refreshed.borrow(), 0);
    assert_eq!(pager.size(), Size::new(320.0, 568.0));

    pager.tick_at(t0 + Duration::from_millis(100));
    pager.tick_at(t0 + Duration::from_millis(500));
    assert_eq!(*refreshed.borrow(), 1);
    assert!(!pager.resize_pending());
    assert_eq!(pager.size(), Size::new(568.0, 320.0));
    assert_eq!(
        wrapper.children()[1].style("height").as_deref(),
        Some("320px")
    );
}

#[test]
fn test_orientation_change_schedules_refresh() {
    let (mut pager, _) = mount(2, PageConfig::default());
    let t0 = Instant::now();
    pager.handle_event_at(&InputEvent::new(NativeEvent::OrientationChange), t0);
    assert!(pager.resize_pending());
    assert_eq!(
        pager.resize_deadline(),
        Some(t0 + Duration::from_millis(60))
    );
    pager.tick_at(t0 + Duration::from_millis(60));
    assert!(!pager.resize_pending());
    assert_eq!(pager.resize_deadline(), None);
}

#[test]
fn test_explicit_size_wins() {
    let config = PageConfig {
        width: Some(200.0),
        height: Some(400.0),
        ..Default::default()
    };
    let (mut pager, wrapper) = mount(2, config);
    assert_eq!(pager.size(), Size::new(200.0, 400.0));

    wrapper.set_rendered_size(Size::new(1024.0, 768.0));
    pager.refresh();
    assert_eq!(pager.size(), Size::new(200.0, 400.0));
}

#[test]
fn test_viewport_fallback() {
    let host = MemoryHost::new().with_viewport(Size::new(375.0, 667.0));
    let (wrapper, _) = host.mount_pages(2, Size::new(0.0, 0.0));
    let pager = Pager::new(
        host,
        ContainerSpec::Element(wrapper),
        SlideSpec::Children,
        PageConfig::default(),
    )
    .unwrap();
    assert_eq!(pager.size(), Size::new(375.0, 667.0));
}

#[test]
fn test_reentrant_handler() {
    let (mut pager, _) = mount(3, PageConfig::default());
    let bus = pager.events();
    let weak = Rc::downgrade(&bus);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let s = seen.clone();
    pager.on(PageEvent::Success, move |payload| {
        s.borrow_mut().push(payload.indices());
        if let Some(bus) = weak.upgrade() {
            bus.emit(PageEvent::Refresh, &EventPayload::None);
        }
    });
    let refreshed = counter(&pager, PageEvent::Refresh);

    assert!(pager.go_to(1));
    assert_eq!(*seen.borrow(), vec![Some((0, 1))]);
    assert_eq!(*refreshed.borrow(), 1);
}
