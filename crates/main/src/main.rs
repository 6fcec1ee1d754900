//! 主应用程序入口
//!
//! 启动求职平台的 HTTP API 服务（提交 producer + 目录 + 认证）。

use std::sync::Arc;
use std::time::Duration;

use application::{
    CatalogService, CatalogServiceDependencies, SubmissionService,
    SubmissionServiceDependencies, SystemClock, UserService, UserServiceDependencies,
};
use config::AppConfig;
use infrastructure::{
    create_pg_pool, AmqpApplicationQueue, BcryptPasswordHasher, PgJobApplicationRepository,
    PgJobRepository, PgTrainingRepository, PgUserRepository, RedisCache,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env_with_defaults();

    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').next_back().unwrap_or("unknown")
    );
    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    // 基础设施适配器
    let cache = Arc::new(RedisCache::connect(&config.redis.url).await?);
    let queue = Arc::new(AmqpApplicationQueue::connect(&config.amqp).await?);

    // 仓储
    let application_repository = Arc::new(PgJobApplicationRepository::new(pg_pool.clone()));
    let job_repository = Arc::new(PgJobRepository::new(pg_pool.clone()));
    let training_repository = Arc::new(PgTrainingRepository::new(pg_pool.clone()));
    let user_repository = Arc::new(PgUserRepository::new(pg_pool));

    let password_hasher: Arc<dyn application::PasswordHasher> =
        Arc::new(BcryptPasswordHasher::default());
    let clock: Arc<dyn application::Clock> = Arc::new(SystemClock);

    // 应用层服务
    let user_service = UserService::new(UserServiceDependencies {
        user_repository,
        password_hasher,
    });
    let catalog_service = CatalogService::new(CatalogServiceDependencies {
        job_repository,
        training_repository,
        cache,
        cache_ttl: Duration::from_secs(config.redis.cache_ttl_secs),
    });
    let submission_service = SubmissionService::new(SubmissionServiceDependencies {
        application_repository,
        queue,
        clock,
    });

    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

    let state = AppState::new(
        Arc::new(user_service),
        Arc::new(catalog_service),
        Arc::new(submission_service),
        jwt_service,
    );

    // 启动 Web 服务器
    let app = router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("求职平台 API 启动在 http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
