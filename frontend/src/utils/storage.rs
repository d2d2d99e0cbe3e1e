use web_sys::{Storage, Window};

const TOKEN_KEYS: [&str; 2] = ["auth", "token"];

pub fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "No window object".to_string())
}

pub fn local_storage() -> Result<Storage, String> {
    window()?
        .local_storage()
        .map_err(|_| "No localStorage".to_string())?
        .ok_or_else(|| "No localStorage".to_string())
}

/// First non-blank value among the stored candidates, in key order.
pub fn first_token<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Bearer token saved by the sign-in flow under `auth` or `token`.
pub fn auth_token() -> Option<String> {
    let storage = local_storage().ok()?;
    first_token(
        TOKEN_KEYS
            .iter()
            .map(|key| storage.get_item(key).ok().flatten()),
    )
}
