use crate::domain::entities::SessionState;

// Views the client can show. Paths mirror the web router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    Home,
    Invest,
    Team,
    Me,
    MyInvestments,
    InvestmentDetail(String),
    Recharge,
    Withdraw,
    BankDetails,
    FundingRecords,
    WithdrawRecords,
    ChangePassword,
}

impl Route {
    // Unknown paths, the root included, yield None.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        let route = match path {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/forgot-password" => Route::ForgotPassword,
            "/home" => Route::Home,
            "/invest" => Route::Invest,
            "/team" => Route::Team,
            "/me" => Route::Me,
            "/my-investments" => Route::MyInvestments,
            "/recharge" => Route::Recharge,
            "/withdraw" => Route::Withdraw,
            "/bank-details" => Route::BankDetails,
            "/funding-records" => Route::FundingRecords,
            "/withdraw-records" => Route::WithdrawRecords,
            "/change-password" => Route::ChangePassword,
            other => {
                let id = other.strip_prefix("/investments/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                Route::InvestmentDetail(id.to_string())
            }
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        let path = match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::ForgotPassword => "/forgot-password",
            Route::Home => "/home",
            Route::Invest => "/invest",
            Route::Team => "/team",
            Route::Me => "/me",
            Route::MyInvestments => "/my-investments",
            Route::InvestmentDetail(id) => return format!("/investments/{id}"),
            Route::Recharge => "/recharge",
            Route::Withdraw => "/withdraw",
            Route::BankDetails => "/bank-details",
            Route::FundingRecords => "/funding-records",
            Route::WithdrawRecords => "/withdraw-records",
            Route::ChangePassword => "/change-password",
        };
        path.to_string()
    }

    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::Register | Route::ForgotPassword
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
    // Session restore still in flight; show a spinner.
    Pending,
}

/// Decides what to show for `path` given the current session.
///
/// Public routes bounce signed-in users to the home view, protected routes
/// bounce anonymous users to the login view, and anything unknown lands on
/// the home view.
pub fn resolve(path: &str, session: &SessionState) -> Navigation {
    let Some(route) = Route::parse(path) else {
        return Navigation::Redirect(Route::Home);
    };
    if session.is_loading() {
        return Navigation::Pending;
    }
    let signed_in = session.user().is_some();
    match (route.is_public(), signed_in) {
        (true, true) => Navigation::Redirect(Route::Home),
        (false, false) => Navigation::Redirect(Route::Login),
        _ => Navigation::Render(route),
    }
}
