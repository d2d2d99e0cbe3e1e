use super::{
    session::AcquisitionSession,
    types::{
        AcquisitionError, AcquisitionSettings, AddressResolver, Delay, LocationSample,
        PositionSource,
    },
};

/// Takes up to `settings.max_attempts` readings and resolves the best one to an address.
///
/// Stops early on the first reading within the accuracy threshold. Any failed
/// reading aborts the whole acquisition without further attempts.
pub async fn acquire_best_fix<S, R, D>(
    source: &S,
    resolver: &R,
    delay: &D,
    settings: &AcquisitionSettings,
) -> Result<LocationSample, AcquisitionError>
where
    S: PositionSource,
    R: AddressResolver,
    D: Delay,
{
    if !source.is_available() {
        log::warn!("positioning capability unavailable");
        return Err(AcquisitionError::CapabilityUnavailable);
    }

    let request = settings.position_request();
    let mut session = AcquisitionSession::new();

    for attempt in 1..=settings.max_attempts {
        let fix = source.request_position(&request).await.map_err(|failure| {
            log::warn!("position attempt {attempt} failed: {failure}");
            AcquisitionError::from(failure)
        })?;
        log::debug!(
            "position attempt {}/{}: accuracy {:?} m",
            attempt,
            settings.max_attempts,
            fix.accuracy_meters
        );

        let good_enough = fix.meets_threshold(settings.accuracy_threshold_meters);
        session = session.record(fix);
        if good_enough {
            break;
        }
        if attempt < settings.max_attempts {
            delay.wait(settings.inter_attempt_delay).await;
        }
    }

    let attempts = session.attempts();
    let fix = session
        .into_best()
        .ok_or(AcquisitionError::NoFixObtained)?;
    log::info!(
        "using fix after {} attempt(s), accuracy {:?} m",
        attempts,
        fix.accuracy_meters
    );

    match resolver.resolve(fix.latitude, fix.longitude).await {
        Ok(address) => Ok(LocationSample { fix, address }),
        Err(err) => {
            log::warn!("reverse geocoding failed: {err}");
            Err(AcquisitionError::AddressResolutionFailed {
                fix,
                reason: err.to_string(),
            })
        }
    }
}
