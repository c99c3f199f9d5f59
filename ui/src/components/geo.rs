//! Browser geolocation and reverse geocoding for the wizard's location
//! step. Failures here are never fatal: the address field stays manually
//! editable as the fallback.

use std::fmt;

use scraplink_common::location::GeoLocation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    /// Browser has no geolocation support.
    Unsupported,
    /// Permission denied or position unavailable.
    Unavailable(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::Unsupported => f.write_str("Geolocation is not supported by your browser"),
            GeoError::Unavailable(msg) => write!(f, "Failed to get your location: {msg}"),
        }
    }
}

/// Ask the browser for the current position.
#[cfg(target_family = "wasm")]
pub async fn current_position() -> Result<GeoLocation, GeoError> {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let geolocation = web_sys::window()
        .and_then(|w| w.navigator().geolocation().ok())
        .ok_or(GeoError::Unsupported)?;

    let (tx, rx) = futures::channel::oneshot::channel::<Result<GeoLocation, GeoError>>();
    let tx = std::rc::Rc::new(std::cell::RefCell::new(Some(tx)));

    let tx_ok = tx.clone();
    let on_success = Closure::<dyn FnMut(web_sys::Position)>::new(move |pos: web_sys::Position| {
        let coords = pos.coords();
        if let Some(tx) = tx_ok.borrow_mut().take() {
            let _ = tx.send(Ok(GeoLocation::new(coords.latitude(), coords.longitude())));
        }
    });
    let on_error =
        Closure::<dyn FnMut(web_sys::PositionError)>::new(move |err: web_sys::PositionError| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(GeoError::Unavailable(err.message())));
            }
        });

    let options = web_sys::PositionOptions::new();
    options.set_enable_high_accuracy(true);

    geolocation
        .get_current_position_with_error_callback_and_options(
            on_success.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
            &options,
        )
        .map_err(|e| GeoError::Unavailable(format!("{e:?}")))?;

    // Keep the callbacks alive until the browser answers.
    let result = rx
        .await
        .unwrap_or(Err(GeoError::Unavailable("no response".into())));
    drop(on_success);
    drop(on_error);
    result
}

#[cfg(not(target_family = "wasm"))]
pub async fn current_position() -> Result<GeoLocation, GeoError> {
    Err(GeoError::Unsupported)
}

/// Resolve coordinates to a display address via the public Nominatim
/// endpoint. Best-effort: any failure just leaves the field untouched.
#[cfg(target_family = "wasm")]
pub async fn reverse_geocode(location: &GeoLocation) -> Option<String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let url = format!(
        "https://nominatim.openstreetmap.org/reverse?format=json&lat={}&lon={}",
        location.latitude, location.longitude
    );

    let window = web_sys::window()?;
    let resp_value = JsFuture::from(window.fetch_with_str(&url)).await.ok()?;
    let resp: web_sys::Response = resp_value.dyn_into().ok()?;
    let text = JsFuture::from(resp.text().ok()?).await.ok()?;
    let body = text.as_string()?;

    let parsed: serde_json::Value = serde_json::from_str(&body).ok()?;
    parsed
        .get("display_name")
        .and_then(|v| v.as_str())
        .map(String::from)
}

#[cfg(not(target_family = "wasm"))]
pub async fn reverse_geocode(_location: &GeoLocation) -> Option<String> {
    None
}
