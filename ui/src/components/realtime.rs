//! Realtime change-notification channel for the `orders` table.
//!
//! One channel per view, scoped to a single order (detail view) or to one
//! user's orders (list view). Every matching change event carries the full
//! changed row; the owning view applies it wholesale via
//! [`scraplink_common::sync::OrderBook`].
//!
//! The channel offers no replay: events missed while disconnected are
//! gone, so `on_connect` fires on every (re)connect and the owning view
//! re-fetches there. `on_disconnect` fires when the socket closes out from
//! under us, so the view can clear its live indicator. Dropping the handle
//! tears the socket down and detaches all callbacks first, so a view that
//! unmounts can never be updated late.

use scraplink_common::identity::UserId;
use scraplink_common::order::OrderId;
use scraplink_common::sync::ChangeEvent;

/// What slice of the `orders` table the channel watches.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    Order(OrderId),
    User(UserId),
}

impl Scope {
    /// Channel topic, also used as the server-side row filter.
    pub fn topic(&self) -> String {
        match self {
            Scope::Order(id) => format!("realtime:public:orders:id=eq.{}", id.0),
            Scope::User(id) => format!("realtime:public:orders:user_id=eq.{}", id.0),
        }
    }
}

pub use imp::RealtimeChannel;

#[cfg(target_family = "wasm")]
mod imp {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    use super::*;

    /// Seconds between heartbeat frames keeping the socket alive.
    const HEARTBEAT_SECS: u32 = 30;

    /// An open realtime subscription. Closing is deterministic: dropping
    /// the handle detaches the message callback first, then closes the
    /// socket, so no event can reach a torn-down view.
    pub struct RealtimeChannel {
        socket: web_sys::WebSocket,
        _on_open: Closure<dyn FnMut()>,
        _on_message: Closure<dyn FnMut(web_sys::MessageEvent)>,
        _on_error: Closure<dyn FnMut(web_sys::ErrorEvent)>,
        _on_close: Closure<dyn FnMut(web_sys::CloseEvent)>,
        _heartbeat: gloo_timers::callback::Interval,
    }

    impl RealtimeChannel {
        /// Open a channel. `on_event` receives decoded change events;
        /// `on_connect` fires on every successful (re)connect and is where
        /// the owning view re-fetches its snapshot; `on_disconnect` fires
        /// when the socket closes without the handle being dropped.
        pub fn open(
            scope: Scope,
            mut on_event: impl FnMut(ChangeEvent) + 'static,
            mut on_connect: impl FnMut() + 'static,
            mut on_disconnect: impl FnMut() + 'static,
        ) -> Option<RealtimeChannel> {
            let url = websocket_url();
            let socket = match web_sys::WebSocket::new(&url) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("realtime socket failed to open: {e:?}");
                    return None;
                }
            };
            socket.set_binary_type(web_sys::BinaryType::Arraybuffer);

            let topic = scope.topic();
            let join_socket = socket.clone();
            let on_open = Closure::<dyn FnMut()>::new(move || {
                let join = serde_json::json!({
                    "topic": topic,
                    "event": "phx_join",
                    "payload": {},
                    "ref": "1",
                });
                if let Err(e) = join_socket.send_with_str(&join.to_string()) {
                    tracing::error!("realtime join failed: {e:?}");
                    return;
                }
                tracing::info!("realtime channel joined: {topic}");
                on_connect();
            });
            socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

            let on_message = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(
                move |msg: web_sys::MessageEvent| {
                    let Some(text) = msg.data().as_string() else {
                        return;
                    };
                    for event in decode_frame(&text) {
                        on_event(event);
                    }
                },
            );
            socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

            let on_error = Closure::<dyn FnMut(web_sys::ErrorEvent)>::new(
                move |e: web_sys::ErrorEvent| {
                    tracing::warn!("realtime socket error: {}", e.message());
                },
            );
            socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

            let on_close = Closure::<dyn FnMut(web_sys::CloseEvent)>::new(
                move |e: web_sys::CloseEvent| {
                    tracing::warn!("realtime socket closed: code {}", e.code());
                    on_disconnect();
                },
            );
            socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

            let heartbeat_socket = socket.clone();
            let heartbeat =
                gloo_timers::callback::Interval::new(HEARTBEAT_SECS * 1_000, move || {
                    let frame = serde_json::json!({
                        "topic": "phoenix",
                        "event": "heartbeat",
                        "payload": {},
                        "ref": "hb",
                    });
                    let _ = heartbeat_socket.send_with_str(&frame.to_string());
                });

            Some(RealtimeChannel {
                socket,
                _on_open: on_open,
                _on_message: on_message,
                _on_error: on_error,
                _on_close: on_close,
                _heartbeat: heartbeat,
            })
        }
    }

    impl Drop for RealtimeChannel {
        fn drop(&mut self) {
            self.socket.set_onopen(None);
            self.socket.set_onmessage(None);
            self.socket.set_onerror(None);
            // Detached before close() so our own teardown never reads as
            // a disconnect.
            self.socket.set_onclose(None);
            if let Err(e) = self.socket.close() {
                tracing::warn!("realtime socket close failed: {e:?}");
            }
        }
    }

    /// Derive the websocket endpoint from the store base URL.
    fn websocket_url() -> String {
        let base = crate::components::store_client::store_url();
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base
        };
        format!("{ws_base}/realtime/v1/websocket?vsn=1.0.0")
    }

    /// Unwrap the phoenix envelope and decode the inner change payload.
    fn decode_frame(text: &str) -> Option<ChangeEvent> {
        let frame: serde_json::Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("undecodable realtime frame: {e}");
                return None;
            }
        };
        if frame.get("event").and_then(|e| e.as_str()) != Some("postgres_changes") {
            return None;
        }
        let payload = frame.get("payload")?.to_string();
        let event = ChangeEvent::parse(&payload);
        if event.is_none() {
            tracing::warn!("skipping unparseable change event");
        }
        event
    }
}

// Non-WASM stub for type checking
#[cfg(not(target_family = "wasm"))]
mod imp {
    use super::*;

    pub struct RealtimeChannel;

    impl RealtimeChannel {
        pub fn open(
            _scope: Scope,
            _on_event: impl FnMut(ChangeEvent) + 'static,
            _on_connect: impl FnMut() + 'static,
            _on_disconnect: impl FnMut() + 'static,
        ) -> Option<RealtimeChannel> {
            tracing::warn!("realtime channel only available in WASM");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_are_scoped_by_filter() {
        assert_eq!(
            Scope::Order(OrderId("abc".into())).topic(),
            "realtime:public:orders:id=eq.abc"
        );
        assert_eq!(
            Scope::User(UserId("u1".into())).topic(),
            "realtime:public:orders:user_id=eq.u1"
        );
    }
}
