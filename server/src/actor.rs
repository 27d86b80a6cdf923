use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use kernel::prelude::entity::{Actor, Role, UserId};

pub static USER_ID_HEADER: &str = "x-user-id";
pub static USER_ROLE_HEADER: &str = "x-user-role";

/// Actor asserted by the upstream authenticator through request headers.
#[derive(Debug)]
pub struct CurrentActor(pub Actor);

#[derive(Debug)]
pub struct Unauthenticated(&'static str);

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        let body = json!({
            "error": "UNAUTHENTICATED",
            "message": self.0,
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or(Unauthenticated("missing or malformed x-user-id header"))?;
        let role = header(parts, USER_ROLE_HEADER)
            .and_then(|raw| raw.parse::<Role>().ok())
            .ok_or(Unauthenticated("missing or malformed x-user-role header"))?;
        Ok(CurrentActor(Actor::new(UserId::new(user_id), role)))
    }
}

#[cfg(test)]
mod test {
    use axum::extract::FromRequestParts;
    use axum::http::Request;
    use uuid::Uuid;

    use kernel::prelude::entity::Role;

    use crate::actor::{CurrentActor, USER_ID_HEADER, USER_ROLE_HEADER};

    async fn extract(headers: &[(&str, &str)]) -> Option<CurrentActor> {
        let mut request = Request::builder();
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let (mut parts, _) = request.body(()).unwrap().into_parts();
        CurrentActor::from_request_parts(&mut parts, &()).await.ok()
    }

    #[tokio::test]
    async fn reads_actor_from_headers() {
        let id = Uuid::new_v4();
        let raw = id.to_string();
        let CurrentActor(actor) = extract(&[
            (USER_ID_HEADER, raw.as_str()),
            (USER_ROLE_HEADER, "Lender"),
        ])
        .await
        .unwrap();
        assert_eq!(actor.user_id().as_ref(), &id);
        assert_eq!(actor.role(), &Role::Lender);
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_headers() {
        let raw = Uuid::new_v4().to_string();
        let id = raw.as_str();
        assert!(extract(&[(USER_ROLE_HEADER, "user")]).await.is_none());
        assert!(extract(&[(USER_ID_HEADER, id)]).await.is_none());
        assert!(extract(&[(USER_ID_HEADER, "42"), (USER_ROLE_HEADER, "user")])
            .await
            .is_none());
        assert!(extract(&[(USER_ID_HEADER, id), (USER_ROLE_HEADER, "admin")])
            .await
            .is_none());
    }
}
