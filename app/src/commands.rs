//! Command handlers.

use crate::cli::Command;
use crate::state::AppState;
use anyhow::{bail, Context};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use wooanalytics_api::{LatestOrder, SalesSeries, StatusCards, TopCustomer};
use wooanalytics_store::stored_token;
use wooanalytics_sync::{RegistrationForm, SessionActions, SyncCoordinator, SyncPhase, SyncView};

/// How often `watch` re-checks whether both loops have exited.
const SETTLE_CHECK: Duration = Duration::from_secs(1);

pub async fn dispatch(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Register {
            email,
            password,
            confirm_password,
            name,
            store_url,
            consumer_key,
            consumer_secret,
        } => {
            let form = RegistrationForm::new(email, password, confirm_password)
                .with_client_name(name)
                .with_store(store_url, consumer_key, consumer_secret);
            register(state, &form).await
        }
        Command::Login { email, password } => login(state, &email, &password).await,
        Command::Logout => logout(state).await,
        Command::Watch => watch_sync(state).await,
        Command::Dashboard => dashboard(state).await,
    }
}

async fn mount(state: &AppState) -> SyncCoordinator {
    SyncCoordinator::mount(
        Arc::new(state.service.clone()),
        state.store.clone(),
        &state.config.polling,
    )
    .await
}

async fn register(state: &AppState, form: &RegistrationForm) -> anyhow::Result<()> {
    let mut coordinator = mount(state).await;
    let result = match coordinator.register(form).await {
        Ok(result) => result,
        Err(e) => {
            coordinator.unmount().await;
            bail!(e);
        }
    };
    println!("Registered client {} ({})", result.client_id, result.email);

    follow(&coordinator).await;
    let view = coordinator.view();
    coordinator.unmount().await;
    settle(&view)
}

async fn watch_sync(state: &AppState) -> anyhow::Result<()> {
    let coordinator = mount(state).await;
    if !coordinator.is_polling() {
        coordinator.unmount().await;
        bail!("No stored session: register or log in first");
    }

    follow(&coordinator).await;
    let view = coordinator.view();
    coordinator.unmount().await;
    settle(&view)
}

/// Print view changes until the view navigates or no loop is left running.
async fn follow(coordinator: &SyncCoordinator) {
    let mut view = coordinator.subscribe();
    print_view(&view.borrow_and_update());

    loop {
        if view.borrow().route.is_some() {
            return;
        }
        match tokio::time::timeout(SETTLE_CHECK, view.changed()).await {
            Ok(Ok(())) => print_view(&view.borrow_and_update()),
            Ok(Err(_)) => return,
            Err(_) => {
                if !coordinator.is_polling() && view.borrow().phase != SyncPhase::Succeeded {
                    return;
                }
            }
        }
    }
}

fn print_view(view: &SyncView) {
    if let Some(message) = &view.message {
        println!("{message}");
    }
    if let Some(alert) = &view.alert {
        eprintln!("{alert}");
    }
}

fn settle(view: &SyncView) -> anyhow::Result<()> {
    match view.phase {
        SyncPhase::Succeeded if view.route.is_some() => {
            println!("Store is ready, open the dashboard");
            Ok(())
        }
        SyncPhase::Failed | SyncPhase::TimedOut => {
            bail!(view.alert.clone().unwrap_or_default())
        }
        SyncPhase::Aborted => bail!("Lost contact with the backend, try again later"),
        _ => {
            println!("Sync still in progress, check again later");
            Ok(())
        }
    }
}

async fn login(state: &AppState, email: &str, password: &str) -> anyhow::Result<()> {
    let actions = SessionActions::new(Arc::new(state.service.clone()), state.store.clone());
    let session = actions.login(email, password).await?;
    println!("Logged in as {}", session.email());
    Ok(())
}

async fn logout(state: &AppState) -> anyhow::Result<()> {
    let actions = SessionActions::new(Arc::new(state.service.clone()), state.store.clone());
    if actions.logout().await? {
        println!("Logged out");
    } else {
        println!("Logged out locally, the server could not be reached");
    }
    Ok(())
}

#[derive(Serialize)]
struct DashboardReport {
    status_cards: StatusCards,
    latest_orders: Vec<LatestOrder>,
    top_customers: Vec<TopCustomer>,
    sales: SalesSeries,
}

async fn dashboard(state: &AppState) -> anyhow::Result<()> {
    let Some(token) = stored_token(state.store.as_ref()).await? else {
        bail!("No stored session: register or log in first");
    };
    let service = state.service.clone().with_bearer(token.as_str());

    let (status_cards, latest_orders, top_customers, comparison) = tokio::try_join!(
        service.status_cards(),
        service.latest_orders(),
        service.top_customers(),
        service.sales_comparison(),
    )
    .context("failed to load dashboard")?;

    let report = DashboardReport {
        status_cards,
        latest_orders,
        top_customers,
        sales: SalesSeries::from_comparison(&comparison),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
