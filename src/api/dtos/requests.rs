use serde::Deserialize;

/// `?email=` on signup and unregister.
#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}
