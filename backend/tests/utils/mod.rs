/// Build the full application around a context's services.
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(actix_web::App::new().configure(|cfg| {
            eazypg_backend::handlers::configure(cfg, &$ctx.services)
        }))
        .await
    };
}

pub mod test_helpers;
