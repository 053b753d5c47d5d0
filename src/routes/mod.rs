/// Router Module Index
///
/// Splits the API by access requirement. Access control is applied at the module
/// level (via Axum layers) so a protected endpoint cannot be mounted without the gate.

/// Routes accessible to any client: reads, registration, login, comment creation.
pub mod public;

/// Routes behind the Authorization Gate. Handlers additionally apply the ownership
/// policy where a resource belongs to a single user.
pub mod authenticated;
