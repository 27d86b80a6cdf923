use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use application::service::{
    CreateBuyRequestService, GetBuyRequestService, ResolveBuyRequestService,
};

use crate::actor::CurrentActor;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{
    BuyRequestTransformer, CreateBuyRequestRequest, GetBuyRequestRequest,
    ListBuyRequestsRequest, ResolveBuyRequestRequest,
};
use self::response::BuyRequestPresenter;

mod request;
mod response;

pub trait BuyRequestRouter {
    fn route_buy_request(self) -> Self;
}

impl BuyRequestRouter for Router<AppModule> {
    fn route_buy_request(self) -> Self {
        self.route(
            "/buy-requests",
            post(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Json(req): Json<CreateBuyRequestRequest>| async move {
                    Controller::new(BuyRequestTransformer, BuyRequestPresenter)
                        .intake(req)
                        .handle(|dto| async move {
                            module.pgpool().create_buy_request(&actor, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .get(
                |State(module): State<AppModule>,
                 CurrentActor(_): CurrentActor,
                 Query(req): Query<ListBuyRequestsRequest>| async move {
                    Controller::new(BuyRequestTransformer, BuyRequestPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.pgpool().get_all_buy_requests(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/buy-requests/:id",
            get(
                |State(module): State<AppModule>,
                 CurrentActor(_): CurrentActor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(BuyRequestTransformer, BuyRequestPresenter)
                        .intake(GetBuyRequestRequest::new(id))
                        .handle(|dto| async move { module.pgpool().get_buy_request(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Path(id): Path<Uuid>,
                 Json(req): Json<ResolveBuyRequestRequest>| async move {
                    Controller::new(BuyRequestTransformer, BuyRequestPresenter)
                        .intake((id, req))
                        .handle(|dto| async move {
                            module.pgpool().resolve_buy_request(&actor, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
