//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps Actix sessions so handlers only deal with domain-friendly
//! operations: persisting a user id at login, resolving the [`Requester`]
//! for a request, and purging the session at logout.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::UserProfileQuery;
use crate::domain::{Error, Requester, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Resolve who is making the request.
    ///
    /// Sessions naming a user that no longer exists resolve to
    /// [`Requester::Anonymous`].
    pub async fn requester(&self, profile: &dyn UserProfileQuery) -> Result<Requester, Error> {
        let Some(id) = self.user_id()? else {
            return Ok(Requester::Anonymous);
        };
        match profile.find_user(&id).await? {
            Some(user) => Ok(Requester::User(user)),
            None => {
                warn!(user_id = %id, "session refers to a missing user");
                Ok(Requester::Anonymous)
            }
        }
    }

    /// Drop every value in the session and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserProfileQuery;
    use crate::domain::{User, Username};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use std::sync::Arc;

    const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn profile_with(user: Option<User>) -> Arc<dyn UserProfileQuery> {
        let mut profile = MockUserProfileQuery::new();
        profile
            .expect_find_user()
            .returning(move |_| Ok(user.clone()));
        Arc::new(profile)
    }

    async fn whoami(
        session: SessionContext,
        profile: web::Data<Arc<dyn UserProfileQuery>>,
    ) -> Result<HttpResponse, Error> {
        let body = match session.requester(profile.get_ref().as_ref()).await? {
            Requester::Anonymous => "anonymous".to_owned(),
            Requester::User(user) => user.username().to_string(),
        };
        Ok(HttpResponse::Ok().body(body))
    }

    async fn login(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = UserId::new(USER_ID).expect("fixture id");
        session.persist_user(&id)?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn logout(session: SessionContext) -> HttpResponse {
        session.clear();
        HttpResponse::NoContent().finish()
    }

    async fn call_whoami(user: Option<User>, log_in: bool) -> String {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(profile_with(user)))
                .route("/login", web::get().to(login))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let mut request = test::TestRequest::get().uri("/whoami");
        if log_in {
            let res =
                test::call_service(&app, test::TestRequest::get().uri("/login").to_request())
                    .await;
            assert_eq!(res.status(), StatusCode::OK);
            request = request.cookie(session_cookie(&res));
        }
        let res = test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        String::from_utf8(body.to_vec()).expect("utf8")
    }

    #[actix_web::test]
    async fn resolves_logged_in_user() {
        let user = User::new(
            UserId::new(USER_ID).expect("id"),
            Username::new("ada").expect("username"),
        );
        assert_eq!(call_whoami(Some(user), true).await, "ada");
    }

    #[actix_web::test]
    async fn missing_session_is_anonymous() {
        assert_eq!(call_whoami(None, false).await, "anonymous");
    }

    #[actix_web::test]
    async fn deleted_account_is_anonymous() {
        assert_eq!(call_whoami(None, true).await, "anonymous");
    }

    #[actix_web::test]
    async fn tampered_user_id_is_ignored() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/id",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(format!("{}", id.is_some())))
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/id")
                .cookie(session_cookie(&set_res))
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "false");
    }

    #[actix_web::test]
    async fn clear_expires_the_cookie() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/login", web::get().to(login))
                .route("/logout", web::get().to(logout)),
        )
        .await;
        let login_res =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(session_cookie(&login_res))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let removal = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie");
        assert_eq!(removal.value(), "");
    }
}
