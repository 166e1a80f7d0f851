use tracing::info;

use crate::domain::entities::Plan;
use crate::domain::errors::AccountError;
use crate::domain::ports::AccountGateway;

// Plan purchase. The entered amount must cover the plan price; only the plan
// id goes to the server, which charges the plan price.
pub struct BuyInvestmentUseCase<'a, G: ?Sized> {
    pub account: &'a G,
}

impl<'a, G> BuyInvestmentUseCase<'a, G>
where
    G: AccountGateway + ?Sized,
{
    pub async fn execute(&self, plan: &Plan, amount: f64) -> Result<(), AccountError> {
        if amount.is_nan() || amount < plan.price {
            return Err(AccountError::BelowPlanMinimum { price: plan.price });
        }
        self.account.buy_investment(&plan.id).await?;
        info!(plan = %plan.id, amount, "investment purchased");
        Ok(())
    }
}
