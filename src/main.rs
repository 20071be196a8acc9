// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Extension;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use skipline::config::settings::Settings;
use skipline::domain::repositories::business_repository::BusinessRepository;
use skipline::domain::repositories::queue_repository::QueueRepository;
use skipline::domain::services::auth_service::AuthService;
use skipline::domain::services::queue_ledger::QueueLedger;
use skipline::infrastructure::database::connection;
use skipline::infrastructure::repositories::business_repo_impl::BusinessRepositoryImpl;
use skipline::infrastructure::repositories::queue_repo_impl::QueueRepositoryImpl;
use skipline::infrastructure::repositories::review_repo_impl::ReviewRepositoryImpl;
use skipline::infrastructure::repositories::subscription_repo_impl::SubscriptionRepositoryImpl;
use skipline::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use skipline::presentation::handlers::{
    auth_handler, business_handler, queue_handler, review_handler, subscription_handler,
};
use skipline::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use skipline::presentation::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use skipline::utils::telemetry;
use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting skipline...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize Components
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
    let business_repo = Arc::new(BusinessRepositoryImpl::new(db.clone()));
    let queue_repo = Arc::new(QueueRepositoryImpl::new(db.clone()));
    let review_repo = Arc::new(ReviewRepositoryImpl::new(db.clone()));
    let subscription_repo = Arc::new(SubscriptionRepositoryImpl::new(db.clone()));

    let ledger = Arc::new(QueueLedger::new(
        queue_repo.clone() as Arc<dyn QueueRepository>,
        business_repo.clone() as Arc<dyn BusinessRepository>,
    ));

    let auth_service = Arc::new(AuthService::new(
        settings.auth.jwt_secret.clone(),
        settings.auth.jwt_refresh_secret.clone(),
        settings.auth.bcrypt_cost,
    ));

    // 5. Setup Auth State
    let auth_state = AuthState {
        auth_service: auth_service.clone(),
    };

    // 6. Start HTTP server
    let public_routes = Router::new()
        .route("/health", get(routes::health_check))
        .route("/v1/version", get(routes::version))
        .route(
            "/v1/auth/register",
            post(auth_handler::register::<UserRepositoryImpl>),
        )
        .route(
            "/v1/auth/login",
            post(auth_handler::login::<UserRepositoryImpl>),
        )
        .route(
            "/v1/auth/refresh",
            post(auth_handler::refresh_token::<UserRepositoryImpl>),
        )
        .route(
            "/v1/auth/forgot-password",
            post(auth_handler::forgot_password::<UserRepositoryImpl>),
        )
        .route(
            "/v1/auth/reset-password",
            post(auth_handler::reset_password::<UserRepositoryImpl>),
        )
        .route(
            "/v1/auth/verify-email",
            post(auth_handler::verify_email::<UserRepositoryImpl>),
        )
        .route(
            "/v1/businesses",
            get(business_handler::list_businesses::<BusinessRepositoryImpl>),
        )
        .route(
            "/v1/businesses/categories",
            get(business_handler::get_categories),
        )
        .route(
            "/v1/businesses/search",
            get(business_handler::search_businesses::<BusinessRepositoryImpl>),
        )
        .route(
            "/v1/businesses/{id}",
            get(business_handler::get_business::<BusinessRepositoryImpl>),
        )
        .route(
            "/v1/reviews/business/{businessId}",
            get(review_handler::list_business_reviews::<ReviewRepositoryImpl>),
        )
        .route(
            "/v1/queues/business/{businessId}/stats",
            get(queue_handler::queue_stats),
        )
        .route(
            "/v1/queues/business/{businessId}/wait-estimate",
            get(queue_handler::wait_estimate),
        );

    let protected_routes = Router::new()
        .route(
            "/v1/auth/profile",
            get(auth_handler::get_profile::<UserRepositoryImpl>),
        )
        .route(
            "/v1/auth/profile",
            put(auth_handler::update_profile::<UserRepositoryImpl>),
        )
        .route(
            "/v1/auth/change-password",
            put(auth_handler::change_password::<UserRepositoryImpl>),
        )
        .route("/v1/queues/join", post(queue_handler::join_queue))
        .route("/v1/queues/my-queues", get(queue_handler::my_queues))
        .route("/v1/queues/current", get(queue_handler::current_queue))
        .route("/v1/queues/{id}", get(queue_handler::get_queue_entry))
        .route("/v1/queues/{id}/leave", post(queue_handler::leave_queue))
        .route(
            "/v1/queues/{id}/notes",
            put(queue_handler::update_queue_notes),
        )
        .route(
            "/v1/queues/{id}/advance",
            post(queue_handler::advance_queue_entry),
        )
        .route(
            "/v1/queues/business/{businessId}/active",
            get(queue_handler::active_entries),
        )
        .route(
            "/v1/reviews",
            post(review_handler::create_review::<ReviewRepositoryImpl, BusinessRepositoryImpl>),
        )
        .route(
            "/v1/reviews/my-reviews",
            get(review_handler::my_reviews::<ReviewRepositoryImpl>),
        )
        .route(
            "/v1/reviews/{id}",
            put(review_handler::update_review::<ReviewRepositoryImpl>),
        )
        .route(
            "/v1/reviews/{id}",
            delete(review_handler::delete_review::<ReviewRepositoryImpl>),
        )
        .route(
            "/v1/subscriptions/plans",
            get(subscription_handler::get_plans),
        )
        .route(
            "/v1/subscriptions",
            get(subscription_handler::my_subscriptions::<SubscriptionRepositoryImpl>),
        )
        .route(
            "/v1/subscriptions/purchase",
            post(subscription_handler::purchase_subscription::<SubscriptionRepositoryImpl>),
        )
        .route(
            "/v1/subscriptions/use-pass",
            post(subscription_handler::use_skip_pass::<SubscriptionRepositoryImpl>),
        )
        .route(
            "/v1/subscriptions/usage-history",
            get(subscription_handler::usage_history::<SubscriptionRepositoryImpl>),
        )
        .route(
            "/v1/subscriptions/{id}/cancel",
            post(subscription_handler::cancel_subscription::<SubscriptionRepositoryImpl>),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(user_repo))
        .layer(Extension(business_repo))
        .layer(Extension(queue_repo))
        .layer(Extension(review_repo))
        .layer(Extension(subscription_repo))
        .layer(Extension(ledger))
        .layer(Extension(auth_service))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
