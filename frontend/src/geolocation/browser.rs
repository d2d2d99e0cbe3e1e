use chrono::{DateTime, Utc};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Promise, Reflect};
use std::time::Duration;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Geolocation, PositionOptions};

use super::types::{Delay, PositionFailure, PositionFix, PositionRequest, PositionSource};

// Numeric codes of the browser's GeolocationPositionError.
const PERMISSION_DENIED: u16 = 1;
const POSITION_UNAVAILABLE: u16 = 2;
const TIMEOUT: u16 = 3;

/// `navigator.geolocation` of the current window.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserGeolocation;

fn geolocation() -> Option<Geolocation> {
    web_sys::window()?.navigator().geolocation().ok()
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

impl PositionSource for BrowserGeolocation {
    fn is_available(&self) -> bool {
        geolocation().is_some()
    }

    async fn request_position(
        &self,
        request: &PositionRequest,
    ) -> Result<PositionFix, PositionFailure> {
        let geo = geolocation().ok_or_else(|| {
            PositionFailure::PositionUnavailable("Geolocation is not available".to_string())
        })?;

        let options = PositionOptions::new();
        options.set_enable_high_accuracy(request.high_accuracy);
        options.set_timeout(millis(request.timeout));
        options.set_maximum_age(millis(request.maximum_age));

        let promise = Promise::new(&mut |resolve, reject| {
            if let Err(err) =
                geo.get_current_position_with_error_callback_and_options(&resolve, Some(&reject), &options)
            {
                let _ = reject.call1(&JsValue::NULL, &err);
            }
        });

        let position = JsFuture::from(promise).await.map_err(|err| failure_from_js(&err))?;
        fix_from_js(&position)
    }
}

fn number(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64())
}

fn fix_from_js(position: &JsValue) -> Result<PositionFix, PositionFailure> {
    let coords = Reflect::get(position, &JsValue::from_str("coords"))
        .ok()
        .filter(|value| value.is_object())
        .ok_or_else(|| PositionFailure::PositionUnavailable("missing coordinates".to_string()))?;

    let (Some(latitude), Some(longitude)) = (number(&coords, "latitude"), number(&coords, "longitude"))
    else {
        return Err(PositionFailure::PositionUnavailable(
            "missing coordinates".to_string(),
        ));
    };

    let captured_at = number(position, "timestamp")
        .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
        .unwrap_or_else(Utc::now);

    Ok(PositionFix {
        latitude,
        longitude,
        accuracy_meters: number(&coords, "accuracy"),
        captured_at,
    })
}

fn failure_from_js(err: &JsValue) -> PositionFailure {
    let message = Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_else(|| "unknown geolocation error".to_string());

    match number(err, "code").map(|code| code as u16) {
        Some(PERMISSION_DENIED) => PositionFailure::PermissionDenied(message),
        Some(TIMEOUT) => PositionFailure::Timeout(message),
        Some(POSITION_UNAVAILABLE) => PositionFailure::PositionUnavailable(message),
        _ => PositionFailure::PositionUnavailable(format!("{message} (unrecognised error)")),
    }
}

/// Waits with a browser timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerDelay;

impl Delay for TimerDelay {
    async fn wait(&self, duration: Duration) {
        TimeoutFuture::new(millis(duration)).await;
    }
}
