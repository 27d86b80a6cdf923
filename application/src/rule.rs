//! Role and ownership checks shared by the lifecycle services.

use std::fmt::Display;

use error_stack::Report;

use kernel::prelude::entity::{Actor, Order, Product};
use kernel::KernelError;

pub(crate) fn missing(kind: &str, id: impl Display) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("{kind} {id} not found"))
}

pub(crate) fn require_lender_role(actor: &Actor) -> error_stack::Result<(), KernelError> {
    if !actor.is_lender() {
        return Err(Report::new(KernelError::Authorization)
            .attach_printable(format!("user {} is not a lender", actor.user_id().as_ref())));
    }
    Ok(())
}

/// Product must be available and must not belong to the requester.
pub(crate) fn require_requestable(
    actor: &Actor,
    product: &Product,
) -> error_stack::Result<(), KernelError> {
    if !product.is_available() {
        return Err(Report::new(KernelError::Conflict).attach_printable(format!(
            "product {} is not available",
            product.id().as_ref()
        )));
    }
    if product.is_lent_by(actor.user_id()) {
        return Err(Report::new(KernelError::Conflict)
            .attach_printable("lenders cannot request their own product"));
    }
    Ok(())
}

pub(crate) fn require_product_lender(
    actor: &Actor,
    product: &Product,
) -> error_stack::Result<(), KernelError> {
    if !product.is_lent_by(actor.user_id()) {
        return Err(Report::new(KernelError::Authorization).attach_printable(format!(
            "user {} does not lend product {}",
            actor.user_id().as_ref(),
            product.id().as_ref()
        )));
    }
    Ok(())
}

pub(crate) fn require_borrower(actor: &Actor, order: &Order) -> error_stack::Result<(), KernelError> {
    if !order.is_borrowed_by(actor.user_id()) {
        return Err(Report::new(KernelError::Authorization).attach_printable(format!(
            "user {} did not borrow order {}",
            actor.user_id().as_ref(),
            order.id().as_ref()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::prelude::entity::{
        Actor, CategoryId, Product, ProductDescription, ProductId, ProductName, Role, UserId,
    };
    use kernel::KernelError;

    use crate::rule::{require_lender_role, require_requestable};

    fn product(lender: &UserId, is_available: bool) -> Product {
        Product::new(
            ProductId::new(Uuid::new_v4()),
            lender.clone(),
            CategoryId::new(Uuid::new_v4()),
            is_available,
            ProductName::new("drill"),
            ProductDescription::new("cordless"),
        )
    }

    #[test]
    fn only_lenders_pass_role_check() {
        let user = Actor::new(UserId::new(Uuid::new_v4()), Role::User);
        let lender = Actor::new(UserId::new(Uuid::new_v4()), Role::Lender);
        assert!(require_lender_role(&lender).is_ok());
        let report = require_lender_role(&user).unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Authorization);
    }

    #[test]
    fn own_or_unavailable_products_conflict() {
        let lender = UserId::new(Uuid::new_v4());
        let borrower = Actor::new(UserId::new(Uuid::new_v4()), Role::User);
        let self_request = Actor::new(lender.clone(), Role::Lender);

        assert!(require_requestable(&borrower, &product(&lender, true)).is_ok());
        let report = require_requestable(&borrower, &product(&lender, false)).unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);
        let report = require_requestable(&self_request, &product(&lender, true)).unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);
    }
}
