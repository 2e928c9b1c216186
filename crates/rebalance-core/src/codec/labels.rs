//! Field labels. These strings are the output contract; renaming one breaks
//! every consumer of the field list.

pub use crate::constants::REBALANCE_TYPE_LABEL as REBALANCE_TYPE;

pub const LOWER_RANGE_BPS: &str = "lowerRangeBps";
pub const UPPER_RANGE_BPS: &str = "upperRangeBps";
pub const RESET_LOWER_RANGE_BPS: &str = "resetLowerRangeBps";
pub const RESET_UPPER_RANGE_BPS: &str = "resetUpperRangeBps";
pub const LOWER_RESET_RATIO_BPS: &str = "lowerResetRatioBps";
pub const UPPER_RESET_RATIO_BPS: &str = "upperResetRatioBps";
pub const EXPANSION_BPS: &str = "expansionBps";
pub const MAX_NUMBER_OF_EXPANSIONS: &str = "maxNumberOfExpansions";
pub const SWAP_UNEVEN_ALLOWED: &str = "swapUnevenAllowed";
pub const EXPANSION_COUNT: &str = "expansionCount";
pub const INITIAL_POOL_PRICE: &str = "initialPoolPrice";

pub const START_MID_TICK: &str = "startMidTick";
pub const TICKS_BELOW_MID: &str = "ticksBelowMid";
pub const TICKS_ABOVE_MID: &str = "ticksAboveMid";
pub const SECONDS_PER_TICK: &str = "secondsPerTick";
pub const DIRECTION: &str = "direction";
pub const LAST_MID_TICK: &str = "lastMidTick";
pub const LAST_DRIFT_TIMESTAMP: &str = "lastDriftTimestamp";

pub const PERIOD: &str = "period";
pub const LAST_REBALANCE_TIMESTAMP: &str = "lastRebalanceTimestamp";

pub const LOWER_SQRT_PRICE_X64: &str = "lowerSqrtPriceX64";
pub const UPPER_SQRT_PRICE_X64: &str = "upperSqrtPriceX64";
pub const LOWER_RESET_SQRT_PRICE_X64: &str = "lowerResetSqrtPriceX64";
pub const UPPER_RESET_SQRT_PRICE_X64: &str = "upperResetSqrtPriceX64";

pub const RANGE_PRICE_LOWER: &str = "rangePriceLower";
pub const RANGE_PRICE_UPPER: &str = "rangePriceUpper";
pub const RESET_PRICE_LOWER: &str = "resetPriceLower";
pub const RESET_PRICE_UPPER: &str = "resetPriceUpper";

pub const DESTINATION_TOKEN: &str = "destinationToken";
pub const STEP: &str = "step";
