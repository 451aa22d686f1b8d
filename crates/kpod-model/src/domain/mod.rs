mod env;
pub use env::{Env, EnvVar};

mod labels;
pub use labels::Labels;

mod constants;
pub use constants::{
    LABEL_CONTAINER_NAME, LABEL_MANAGED_BY, MANAGED_BY_VALUE, RESERVED_LABEL_PREFIX,
};
