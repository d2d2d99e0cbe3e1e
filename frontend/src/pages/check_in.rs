use leptos::*;

use crate::{
    api::{CheckInClient, CheckInRecord, CheckInRequest},
    geocode::NominatimResolver,
    geolocation::{
        acquire_best_fix,
        browser::{BrowserGeolocation, TimerDelay},
        AcquisitionSettings, LocationSample,
    },
};

fn confirm_low_accuracy(accuracy_meters: i64) -> bool {
    let message = format!(
        "GPS accuracy is {} meters which is lower than recommended. Do you want to proceed?",
        accuracy_meters
    );
    web_sys::window()
        .and_then(|w| w.confirm_with_message(&message).ok())
        .unwrap_or(false)
}

fn captured_message(sample: &LocationSample) -> String {
    match sample.rounded_accuracy() {
        Some(meters) => format!("Location captured (accuracy {} m)", meters),
        None => "Location captured".to_string(),
    }
}

#[component]
pub fn CheckInPage() -> impl IntoView {
    let settings = AcquisitionSettings::default();
    let threshold = settings.accuracy_threshold_meters;

    let (label, set_label) = create_signal(String::new());
    let (sample, set_sample) = create_signal(None::<LocationSample>);
    let (locating, set_locating) = create_signal(false);
    let (saving, set_saving) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);
    let (success, set_success) = create_signal(None::<String>);
    let (today, set_today) = create_signal(None::<CheckInRecord>);

    spawn_local(async move {
        let client = CheckInClient::from_browser();
        if !client.has_token() {
            return;
        }
        match client.today().await {
            Ok(status) => set_today.set(status.check_in),
            Err(err) => log::warn!("failed to load today's check-in: {}", err),
        }
    });

    let on_locate = move |_| {
        set_locating.set(true);
        set_error.set(None);
        set_success.set(None);
        spawn_local(async move {
            let resolver = NominatimResolver::default();
            match acquire_best_fix(&BrowserGeolocation, &resolver, &TimerDelay, &settings).await {
                Ok(found) => {
                    set_success.set(Some(captured_message(&found)));
                    set_sample.set(Some(found));
                }
                Err(err) => set_error.set(Some(err.to_string())),
            }
            set_locating.set(false);
        });
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = sample.get_untracked() else {
            set_error.set(Some("Please capture your current location first.".into()));
            return;
        };
        if current.is_low_accuracy(threshold)
            && !confirm_low_accuracy(current.rounded_accuracy().unwrap_or_default())
        {
            return;
        }

        let client = CheckInClient::from_browser();
        if !client.has_token() {
            set_error.set(Some("Authentication required".into()));
            return;
        }
        let request = CheckInRequest {
            label: label.get_untracked(),
            latitude: current.fix.latitude,
            longitude: current.fix.longitude,
            address: current.address,
        };

        set_saving.set(true);
        set_error.set(None);
        set_success.set(None);
        spawn_local(async move {
            match client.submit(&request).await {
                Ok(record) => {
                    set_success.set(Some("Attendance recorded successfully!".into()));
                    // Keep the captured location; only the name is cleared.
                    set_label.set(String::new());
                    set_today.set(Some(record));
                }
                Err(err) if err.error.trim().is_empty() => {
                    set_error.set(Some("Failed to record attendance".into()))
                }
                Err(err) => set_error.set(Some(err.to_string())),
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class="check-in-container">
            <h2>"Record Attendance"</h2>
            {move || today.get().map(|record| {
                let at = record.created_at.with_timezone(&chrono::Local).format("%H:%M").to_string();
                view! {
                    <div class="info-message">
                        {format!("You already checked in today at {} ({})", at, record.label)}
                    </div>
                }
            })}
            {move || error.get().map(|msg| view! { <div class="error-message">{msg}</div> })}
            {move || success.get().map(|msg| view! { <div class="success-message">{msg}</div> })}
            <form class="check-in-form" on:submit=on_submit>
                <div class="form-group">
                    <label for="checkInLocation">"Location Name:"</label>
                    <input
                        type="text"
                        id="checkInLocation"
                        placeholder="e.g., Office, Home Office, Client Site"
                        required
                        prop:value=move || label.get()
                        on:input=move |ev| set_label.set(event_target_value(&ev))
                    />
                </div>

                <button
                    type="button"
                    class="location-btn"
                    disabled=move || locating.get()
                    on:click=on_locate
                >
                    {move || if locating.get() { "Getting Location..." } else { "Get Current Location" }}
                </button>

                {move || sample.get().map(|s| {
                    let low = s.is_low_accuracy(threshold);
                    view! {
                        <div class="location-details">
                            <p><strong>"Current Address: "</strong>{s.address.clone()}</p>
                            <p><strong>"Latitude: "</strong>{s.fix.latitude.to_string()}</p>
                            <p><strong>"Longitude: "</strong>{s.fix.longitude.to_string()}</p>
                            {s.rounded_accuracy().map(|meters| view! {
                                <p><strong>"GPS accuracy: "</strong>{format!("{} meters", meters)}</p>
                            })}
                            {low.then(|| view! {
                                <p class="error-message">
                                    "GPS accuracy is low. Try moving a bit or wait a few seconds and retry."
                                </p>
                            })}
                        </div>
                    }
                })}

                <button
                    type="submit"
                    class="submit-btn"
                    disabled=move || {
                        saving.get() || sample.with(|s| s.is_none()) || label.with(|l| l.trim().is_empty())
                    }
                >
                    {move || if saving.get() { "Saving..." } else { "Record Attendance" }}
                </button>
            </form>
        </div>
    }
}
