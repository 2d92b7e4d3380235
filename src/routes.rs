use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

use crate::{
    api::{borrow, clearance, employee, import, material, report},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter)
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter)
                    .route(web::post().to(handlers::refresh_token)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::resource("/auth/change-password")
                    .route(web::post().to(handlers::change_password)),
            )
            .service(
                web::scope("/admin")
                    .service(
                        web::resource("/pending-users")
                            .route(web::get().to(handlers::pending_users)),
                    )
                    .service(
                        web::resource("/users/{id}")
                            .route(web::delete().to(handlers::reject_user)),
                    )
                    .service(
                        web::resource("/users/{id}/approve")
                            .route(web::post().to(handlers::approve_user)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/{id}").route(web::get().to(employee::get_employee)),
                    )
                    .service(
                        web::resource("/{id}/outstanding")
                            .route(web::get().to(borrow::outstanding)),
                    ),
            )
            .service(
                web::scope("/materials").service(
                    web::resource("")
                        .route(web::post().to(material::create_material))
                        .route(web::get().to(material::list_materials)),
                ),
            )
            .service(web::resource("/borrow").route(web::post().to(borrow::issue)))
            .service(
                web::scope("/return")
                    .service(web::resource("").route(web::post().to(borrow::return_all)))
                    .service(
                        web::resource("/selected")
                            .route(web::post().to(borrow::return_selected)),
                    ),
            )
            .service(
                web::scope("/waiting")
                    .service(web::resource("").route(web::get().to(clearance::waiting_list)))
                    .service(
                        web::resource("/{id}")
                            .route(web::post().to(clearance::add_to_waiting))
                            .route(web::delete().to(clearance::remove_from_waiting)),
                    ),
            )
            .service(
                web::scope("/leave-out")
                    .service(web::resource("").route(web::get().to(clearance::leave_out_list)))
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::post().to(clearance::approve_leave)),
                    )
                    .service(
                        web::resource("/{id}/reinstate")
                            .route(web::post().to(clearance::reinstate)),
                    ),
            )
            .service(web::resource("/stats").route(web::get().to(report::stats)))
            .service(
                web::resource("/reports/inventory")
                    .route(web::get().to(report::inventory_report)),
            )
            .service(
                web::scope("/import")
                    .service(
                        web::resource("/employees")
                            .route(web::post().to(import::import_employees)),
                    )
                    .service(
                        web::resource("/materials")
                            .route(web::post().to(import::import_materials)),
                    )
                    .service(web::resource("/users").route(web::post().to(import::import_users))),
            ),
    );
}
