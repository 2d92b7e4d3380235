use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::borrow::{IssueRequest, ReturnAllRequest, ReturnSelectedRequest};
use crate::api::clearance::{LeaveOutMember, WaitingMember};
use crate::api::employee::{CreateEmployee, RosterEntry};
use crate::api::material::{CreateMaterial, MaterialFilter};
use crate::api::report::{BorrowedByEmployee, DashboardStats, InventoryReport};
use crate::auth::handlers::{LoginResponse, PendingUser};
use crate::engine::borrow::ReturnOutcome;
use crate::model::borrow_record::BorrowRecord;
use crate::model::employee::Employee;
use crate::model::leave::LeaveRecord;
use crate::model::material::Material;
use crate::model::waiting::WaitingEntry;
use crate::models::{ChangePasswordReq, LoginReqDto, UserReq};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Material Tracking API",
        version = "1.0.0",
        description = r#"
## Material Tracking System

Tracks office equipment ("materials") lent to employees.

### Key Features
- **Employee & Material registry** with bulk import
- **Borrow / Return** — issue materials, return everything or a selection
- **Clearance** — waiting-for-return queue and leave-out archive gating
  an employee's departure on "no outstanding materials"
- **Reports** — dashboard counters and inventory feeds

### Security
JWT Bearer authentication; new accounts require admin approval.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::change_password,
        crate::auth::handlers::pending_users,
        crate::auth::handlers::approve_user,
        crate::auth::handlers::reject_user,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,

        crate::api::material::create_material,
        crate::api::material::list_materials,

        crate::api::borrow::issue,
        crate::api::borrow::return_all,
        crate::api::borrow::return_selected,
        crate::api::borrow::outstanding,

        crate::api::clearance::waiting_list,
        crate::api::clearance::add_to_waiting,
        crate::api::clearance::remove_from_waiting,
        crate::api::clearance::leave_out_list,
        crate::api::clearance::approve_leave,
        crate::api::clearance::reinstate,

        crate::api::report::stats,
        crate::api::report::inventory_report,

        crate::api::import::import_employees,
        crate::api::import::import_materials,
        crate::api::import::import_users
    ),
    components(
        schemas(
            Employee,
            Material,
            BorrowRecord,
            WaitingEntry,
            LeaveRecord,
            CreateEmployee,
            RosterEntry,
            CreateMaterial,
            MaterialFilter,
            IssueRequest,
            ReturnAllRequest,
            ReturnSelectedRequest,
            ReturnOutcome,
            WaitingMember,
            LeaveOutMember,
            DashboardStats,
            BorrowedByEmployee,
            InventoryReport,
            UserReq,
            LoginReqDto,
            ChangePasswordReq,
            LoginResponse,
            PendingUser
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication and account approval"),
        (name = "Admin", description = "Administrative account management"),
        (name = "Employee", description = "Employee registry"),
        (name = "Material", description = "Material registry"),
        (name = "Borrow", description = "Issue and return operations"),
        (name = "Clearance", description = "Waiting queue and leave-out archive"),
        (name = "Report", description = "Dashboard and inventory feeds"),
        (name = "Import", description = "Bulk import"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
