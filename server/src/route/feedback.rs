use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use application::service::{GetFeedbackService, GiveFeedbackService};

use crate::actor::CurrentActor;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{FeedbackTransformer, GiveFeedbackRequest};
use self::response::FeedbackPresenter;

mod request;
mod response;

pub trait FeedbackRouter {
    fn route_feedback(self) -> Self;
}

impl FeedbackRouter for Router<AppModule> {
    fn route_feedback(self) -> Self {
        self.route(
            "/feedbacks",
            post(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Json(req): Json<GiveFeedbackRequest>| async move {
                    Controller::new(FeedbackTransformer, FeedbackPresenter)
                        .intake(req)
                        .handle(|dto| async move {
                            module.pgpool().give_feedback(&actor, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/feedbacks/given",
            get(
                |State(module): State<AppModule>, CurrentActor(actor): CurrentActor| async move {
                    Controller::new((), FeedbackPresenter)
                        .bypass(|| async move { module.pgpool().get_given_feedback(&actor).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/feedbacks/received",
            get(
                |State(module): State<AppModule>, CurrentActor(actor): CurrentActor| async move {
                    Controller::new((), FeedbackPresenter)
                        .bypass(|| async move {
                            module.pgpool().get_received_feedback(&actor).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
