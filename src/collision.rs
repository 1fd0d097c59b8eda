use crate::body::Body;
use crate::terrain::Platform;
use crate::tuning::CollisionConfig;

/// Land the body on any platform it is falling onto this tick
///
/// A platform catches the body when all hold:
/// - the body is falling or at rest (vy >= 0)
/// - the horizontal extents overlap
/// - the bottom edge is at most `landing_tolerance` below the platform top
/// - the next vertical step would reach the top
///
/// Hits are applied in platform order, last write wins. Returns whether
/// any platform caught the body. Without a hit, a body whose bottom is
/// above `ground_y` can't stay grounded (walking off a ledge).
pub fn resolve(
    body: &mut Body,
    platforms: &[Platform],
    ground_y: f32,
    config: &CollisionConfig,
) -> bool {
    let mut on_platform = false;
    for platform in platforms {
        if lands_on(body, platform, config) {
            body.land_on(platform.top());
            on_platform = true;
        }
    }
    if !on_platform && body.bottom() < ground_y {
        body.grounded = false;
    }
    on_platform
}

fn lands_on(body: &Body, platform: &Platform, config: &CollisionConfig) -> bool {
    let top = platform.top();
    let bottom = body.bottom();
    body.velocity.y >= 0.0
        && body.bounding_box().overlaps_horizontally(&platform.bounding_box())
        && bottom <= top + config.landing_tolerance
        && bottom + body.velocity.y >= top
}
