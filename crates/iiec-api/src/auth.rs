// Bearer-token authentication
//
// `POST /users/login` exchanges email + password for an access token;
// `GET /users/verify` checks a stored token and returns the user it
// belongs to. Token persistence is the caller's concern.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{ApiClient, error_detail, parse_json};
use crate::error::Error;
use crate::models::{ApiUser, LoginRequest, LoginResponse, VerifyResponse};

impl ApiClient {
    /// Authenticate with email/password.
    ///
    /// Any non-success response becomes [`Error::Authentication`] carrying
    /// the backend's `detail` message, or `"Login failed"` when the body
    /// has none.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.url("users/login")?;
        debug!("logging in at {}", url);

        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: error_detail(&body).unwrap_or_else(|| "Login failed".into()),
            });
        }

        let login: LoginResponse = parse_json(resp).await?;
        debug!("login successful");
        Ok(login)
    }

    /// Verify a bearer token and return its user.
    ///
    /// A 401 comes back as [`Error::Unauthorized`]; a 2xx body that says
    /// `valid: false` or carries no user is an [`Error::Authentication`].
    pub async fn verify(&self, token: &SecretString) -> Result<ApiUser, Error> {
        let url = self.url("users/verify")?;
        let resp: VerifyResponse = self.get(url, Some(token)).await?;

        if resp.valid == Some(false) {
            return Err(Error::Authentication {
                message: "Token verification failed".into(),
            });
        }

        resp.user.ok_or_else(|| Error::Authentication {
            message: "Token verification returned no user".into(),
        })
    }
}
