//! Position feed for SilentZone.
//!
//! Abstracts the device location provider as a push-based stream of fixes
//! and errors. The domain side only ever sees a `FeedCallback` invoked with
//! `FeedEvent`s, one at a time.
//!
//! # Providers
//!
//! - `BroadcastProvider` - a device adapter pushes fixes through a `FixSender`
//! - `ReplayProvider` - scripted track, for demos and tests
//! - `UnsupportedProvider` - platforms without geolocation
//!
//! Every subscription enforces `FeedOptions`: fixes older than the maximum
//! age are dropped, and a timeout error is surfaced whenever no fix arrives
//! within the fix timeout. Errors never end a subscription.

mod broadcast;
mod error;
mod fix;
mod options;
mod provider;
mod replay;

pub use broadcast::{BroadcastProvider, FixSender};
pub use error::FeedError;
pub use fix::{FeedEvent, Fix, PositionError, LOCATION_SERVICES_MESSAGE, UNSUPPORTED_MESSAGE};
pub use options::FeedOptions;
pub use provider::{FeedCallback, PositionProvider, SubscriptionHandle, UnsupportedProvider};
pub use replay::{ReplayEvent, ReplayProvider, ReplayStep};
