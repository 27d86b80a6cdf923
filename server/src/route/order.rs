use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use uuid::Uuid;

use application::service::{GetOrderService, MarkOrderReturnedService, UpdateOrderStatusService};

use crate::actor::CurrentActor;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{
    MarkOrderReturnedRequest, OrderHistoryRequest, OrderTransformer, UpdateOrderStatusRequest,
};
use self::response::OrderPresenter;

mod request;
mod response;

pub trait OrderRouter {
    fn route_order(self) -> Self;
}

impl OrderRouter for Router<AppModule> {
    fn route_order(self) -> Self {
        self.route(
            "/orders/history",
            get(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 axum_extra::extract::Query(req): axum_extra::extract::Query<
                    OrderHistoryRequest,
                >| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(req)
                        .handle(|dto| async move {
                            module.pgpool().get_order_history(&actor, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/lender",
            get(
                |State(module): State<AppModule>, CurrentActor(actor): CurrentActor| async move {
                    Controller::new((), OrderPresenter)
                        .bypass(|| async move { module.pgpool().get_lender_orders(&actor).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/awaiting-return",
            get(
                |State(module): State<AppModule>, CurrentActor(actor): CurrentActor| async move {
                    Controller::new((), OrderPresenter)
                        .bypass(|| async move {
                            module.pgpool().get_approved_awaiting_orders(&actor).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/status",
            patch(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateOrderStatusRequest>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake((id, req))
                        .handle(|dto| async move {
                            module.pgpool().update_order_status(&actor, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/return",
            patch(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(MarkOrderReturnedRequest::new(id))
                        .handle(|dto| async move {
                            module.pgpool().mark_order_returned(&actor, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
