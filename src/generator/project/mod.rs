mod generate;
mod scaffold;

pub use generate::{generate, generate_from_spec, Emitter};
pub use scaffold::{
    create_app, plan_app, validate_app_name, AppPlan, ScaffoldOptions, ScaffoldReport,
    TEMPLATE_SUFFIX,
};
