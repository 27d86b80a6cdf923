use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use uuid::Uuid;

use application::service::{
    CreateReturnRequestService, GetReturnRequestService, ResolveReturnRequestService,
};

use crate::actor::CurrentActor;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{
    CreateReturnRequestRequest, ResolveReturnRequestRequest, ReturnRequestTransformer,
};
use self::response::ReturnRequestPresenter;

mod request;
mod response;

pub trait ReturnRequestRouter {
    fn route_return_request(self) -> Self;
}

impl ReturnRequestRouter for Router<AppModule> {
    fn route_return_request(self) -> Self {
        self.route(
            "/return-requests",
            get(
                |State(module): State<AppModule>, CurrentActor(actor): CurrentActor| async move {
                    Controller::new((), ReturnRequestPresenter)
                        .bypass(|| async move {
                            module.pgpool().get_pending_return_requests(&actor).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Json(req): Json<CreateReturnRequestRequest>| async move {
                    Controller::new(ReturnRequestTransformer, ReturnRequestPresenter)
                        .intake(req)
                        .handle(|dto| async move {
                            module.pgpool().create_return_request(&actor, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/return-requests/:id",
            patch(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Path(id): Path<Uuid>,
                 Json(req): Json<ResolveReturnRequestRequest>| async move {
                    Controller::new(ReturnRequestTransformer, ReturnRequestPresenter)
                        .intake((id, req))
                        .handle(|dto| async move {
                            module.pgpool().resolve_return_request(&actor, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
