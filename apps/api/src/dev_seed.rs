use partnerdesk_application::{AddApprovalInput, ProvisionUserInput};
use partnerdesk_core::{AppError, AppResult, UserIdentity};
use partnerdesk_domain::{ApprovalMetadata, ApprovalPriority, ApprovalType};
use tracing::info;

use crate::state::AppState;

struct SeedUser {
    email: &'static str,
    display_name: &'static str,
    role: &'static str,
}

const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        email: "admin@partnerdesk.test",
        display_name: "Portal Admin",
        role: "Super Admin",
    },
    SeedUser {
        email: "ops.manager@partnerdesk.test",
        display_name: "Jane Okafor",
        role: "Operations Manager",
    },
    SeedUser {
        email: "card.ops@partnerdesk.test",
        display_name: "Sam Card Ops",
        role: "Card Operations",
    },
    SeedUser {
        email: "support@partnerdesk.test",
        display_name: "Riley Support",
        role: "Support Agent",
    },
    SeedUser {
        email: "auditor@partnerdesk.test",
        display_name: "Alex Auditor",
        role: "Auditor",
    },
];

/// Seeds one user per built-in role and a few approval requests.
pub async fn run(app_state: &AppState, password: &str) -> AppResult<()> {
    for user in SEED_USERS {
        match app_state
            .user_service
            .provision_user(ProvisionUserInput {
                email: user.email.to_owned(),
                display_name: user.display_name.to_owned(),
                role: user.role.to_owned(),
                password: password.to_owned(),
            })
            .await
        {
            Ok(_) | Err(AppError::Conflict(_)) => {}
            Err(error) => return Err(error),
        }
    }

    let admin = login(app_state, "admin@partnerdesk.test", password).await?;
    let card_ops = login(app_state, "card.ops@partnerdesk.test", password).await?;
    let manager = login(app_state, "ops.manager@partnerdesk.test", password).await?;

    let hotlist = submit(
        app_state,
        &card_ops,
        ApprovalType::Hotlist,
        "Hotlist Card - ****4532",
        "Cardholder reported the card stolen",
        ApprovalPriority::High,
        &[("cardNumber", "****4532"), ("reason", "stolen")],
    )
    .await?;
    submit(
        app_state,
        &card_ops,
        ApprovalType::LimitChange,
        "Limit Increase - ****8812",
        "Raise daily spend limit for travel",
        ApprovalPriority::Medium,
        &[
            ("cardNumber", "****8812"),
            ("currentLimit", "5000"),
            ("requestedLimit", "12000"),
        ],
    )
    .await?;
    let card_request = submit(
        app_state,
        &card_ops,
        ApprovalType::CardRequest,
        "Bulk Card Request - 25 cards",
        "Corporate program onboarding batch",
        ApprovalPriority::Low,
        &[("quantity", "25")],
    )
    .await?;
    submit(
        app_state,
        &admin,
        ApprovalType::ConfigChange,
        "Update MCC block list",
        "Block gambling merchant category codes",
        ApprovalPriority::Medium,
        &[("setting", "mcc_block_list")],
    )
    .await?;

    app_state
        .approval_service
        .approve(
            &manager,
            &hotlist,
            Some("Confirmed with cardholder".to_owned()),
        )
        .await?;
    app_state
        .approval_service
        .reject(
            &manager,
            &card_request,
            Some("Program contract not signed yet".to_owned()),
        )
        .await?;

    info!(
        users = SEED_USERS.len(),
        "demo users and approval requests seeded"
    );

    Ok(())
}

async fn login(app_state: &AppState, email: &str, password: &str) -> AppResult<UserIdentity> {
    app_state.user_service.login(email, password).await
}

async fn submit(
    app_state: &AppState,
    actor: &UserIdentity,
    approval_type: ApprovalType,
    subject: &str,
    description: &str,
    priority: ApprovalPriority,
    metadata: &[(&str, &str)],
) -> AppResult<partnerdesk_domain::ApprovalId> {
    app_state
        .approval_service
        .add_approval(
            actor,
            AddApprovalInput {
                approval_type,
                subject: subject.to_owned(),
                description: description.to_owned(),
                priority,
                requested_status: None,
                metadata: metadata
                    .iter()
                    .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                    .collect::<ApprovalMetadata>(),
            },
        )
        .await
}
