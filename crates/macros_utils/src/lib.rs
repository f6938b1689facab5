//! Small macros shared by the HTTP apps.

#[cfg(feature = "actix")]
#[doc(hidden)]
pub use actix_web;

/// Generates a `pub fn routes(cfg: &mut ServiceConfig)` for a routes module.
///
/// `route` registers handlers declared with the actix route attributes,
/// `load` declares child modules and chains their own `routes` functions.
///
/// ```ignore
/// macros_utils::routes! {
///     load index,
///     load ping,
/// }
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    ($(route $route:path),+ $(,)?) => {
        pub fn routes(cfg: &mut $crate::actix_web::web::ServiceConfig) {
            $( cfg.service($route); )+
        }
    };
    ($(load $module:ident),+ $(,)?) => {
        $( mod $module; )+

        pub fn routes(cfg: &mut $crate::actix_web::web::ServiceConfig) {
            $( $module::routes(cfg); )+
        }
    };
}
