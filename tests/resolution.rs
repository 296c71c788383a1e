//! End-to-end resolution tests through the registry and driver.
//!
//! The dns tests for `localhost` rely only on the hosts file via the system
//! resolver, so they run without network access. Tests that need real
//! external DNS are marked `#[ignore]` and run via `cargo test -- --ignored`.

#[path = "helpers.rs"]
mod helpers;

use std::time::Duration;

use channel_resolver::{create_resolver, register_all, ResolutionDriver, StatusCode};
use helpers::{next_event, rendered, ChannelListener, Event};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test]
async fn test_resolves_localhost_with_port() {
    register_all();
    let (listener, mut rx) = ChannelListener::new();
    let resolver = create_resolver("localhost:50051", listener).unwrap();
    resolver.update_resolution();

    match next_event(&mut rx, CALLBACK_TIMEOUT).await {
        Event::Success { addresses, .. } => {
            let addresses = rendered(&addresses);
            assert!(
                addresses.contains(&"127.0.0.1:50051".to_string()),
                "expected 127.0.0.1:50051 in {addresses:?}"
            );
        }
        Event::Error(status) => panic!("resolution failed: {status}"),
    }
}

#[tokio::test]
async fn test_defaults_to_port_443() {
    register_all();
    let (listener, mut rx) = ChannelListener::new();
    let resolver = create_resolver("localhost", listener).unwrap();
    resolver.update_resolution();

    match next_event(&mut rx, CALLBACK_TIMEOUT).await {
        Event::Success { addresses, .. } => {
            let addresses = rendered(&addresses);
            assert!(
                addresses.contains(&"127.0.0.1:443".to_string()),
                "expected 127.0.0.1:443 in {addresses:?}"
            );
        }
        Event::Error(status) => panic!("resolution failed: {status}"),
    }
}

#[tokio::test]
async fn test_literal_ip_target_skips_dns() {
    register_all();
    let (listener, mut rx) = ChannelListener::new();
    let resolver = create_resolver("dns:///127.0.0.1:3000", listener).unwrap();
    resolver.update_resolution();

    match next_event(&mut rx, Duration::from_secs(1)).await {
        Event::Success { addresses, .. } => {
            assert_eq!(rendered(&addresses), vec!["127.0.0.1:3000".to_string()]);
        }
        Event::Error(status) => panic!("resolution failed: {status}"),
    }
}

#[tokio::test]
async fn test_relative_unix_socket() {
    register_all();
    let (listener, mut rx) = ChannelListener::new();
    let resolver = create_resolver("unix:socket", listener).unwrap();
    resolver.update_resolution();

    match next_event(&mut rx, CALLBACK_TIMEOUT).await {
        Event::Success { addresses, .. } => {
            assert_eq!(rendered(&addresses), vec!["socket".to_string()]);
        }
        Event::Error(status) => panic!("resolution failed: {status}"),
    }
}

#[tokio::test]
async fn test_absolute_unix_socket() {
    register_all();
    let (listener, mut rx) = ChannelListener::new();
    let resolver = create_resolver("unix:///tmp/socket", listener).unwrap();
    resolver.update_resolution();

    match next_event(&mut rx, CALLBACK_TIMEOUT).await {
        Event::Success { addresses, .. } => {
            assert_eq!(rendered(&addresses), vec!["/tmp/socket".to_string()]);
        }
        Event::Error(status) => panic!("resolution failed: {status}"),
    }
}

#[tokio::test]
async fn test_unregistered_scheme_fails_synchronously() {
    register_all();
    let (listener, mut rx) = ChannelListener::new();
    let result = create_resolver("foo://bar/baz", listener);
    assert!(result.is_err());

    // The failure was reported through the listener before create returned.
    match rx.try_recv().expect("expected a synchronous error callback") {
        Event::Error(status) => {
            assert_eq!(status.code, StatusCode::Unavailable);
            assert!(status.details.contains("foo"));
        }
        Event::Success { addresses, .. } => {
            panic!("unregistered scheme must not resolve, got {addresses:?}")
        }
    }
}

#[tokio::test]
async fn test_two_resolvers_for_same_target_resolve_independently() {
    register_all();
    let (listener1, mut rx1) = ChannelListener::new();
    let (listener2, mut rx2) = ChannelListener::new();
    let resolver1 = create_resolver("localhost:50051", listener1).unwrap();
    let resolver2 = create_resolver("localhost:50051", listener2).unwrap();
    resolver1.update_resolution();
    resolver2.update_resolution();

    for rx in [&mut rx1, &mut rx2] {
        match next_event(rx, CALLBACK_TIMEOUT).await {
            Event::Success { addresses, .. } => {
                assert!(rendered(&addresses).contains(&"127.0.0.1:50051".to_string()));
            }
            Event::Error(status) => panic!("resolution failed: {status}"),
        }
    }
}

#[tokio::test]
async fn test_driver_end_to_end_with_unix_target() {
    register_all();
    let (listener, mut rx) = ChannelListener::new();
    let driver = ResolutionDriver::new("unix:socket", listener.clone());
    driver.update_resolution();

    match next_event(&mut rx, CALLBACK_TIMEOUT).await {
        Event::Success { addresses, .. } => {
            assert_eq!(rendered(&addresses), vec!["socket".to_string()]);
        }
        Event::Error(status) => panic!("resolution failed: {status}"),
    }
    assert_eq!(driver.default_authority(), "socket");
}

#[tokio::test]
async fn test_unresolvable_host_keeps_retrying() {
    register_all();
    let (listener, mut rx) = ChannelListener::new();
    // `.invalid` is reserved (RFC 2606) and never resolves.
    let resolver = create_resolver("host.invalid:50051", listener).unwrap();
    resolver.update_resolution();

    match next_event(&mut rx, CALLBACK_TIMEOUT).await {
        Event::Error(status) => {
            assert_eq!(status.code, StatusCode::Unavailable);
            assert!(
                status.details.contains("host.invalid"),
                "details should name the host: {}",
                status.details
            );
        }
        Event::Success { addresses, .. } => panic!("unexpected success: {addresses:?}"),
    }

    // The retry is internal: a second failure arrives without another
    // update_resolution() call.
    match next_event(&mut rx, CALLBACK_TIMEOUT).await {
        Event::Error(status) => assert_eq!(status.code, StatusCode::Unavailable),
        Event::Success { addresses, .. } => panic!("unexpected success: {addresses:?}"),
    }
}

/// Requires working external DNS.
#[tokio::test]
#[ignore]
async fn test_resolves_public_address() {
    register_all();
    let (listener, mut rx) = ChannelListener::new();
    let resolver = create_resolver("example.com", listener).unwrap();
    resolver.update_resolution();

    match next_event(&mut rx, CALLBACK_TIMEOUT).await {
        Event::Success { addresses, .. } => assert!(!addresses.is_empty()),
        Event::Error(status) => panic!("resolution failed: {status}"),
    }
}
