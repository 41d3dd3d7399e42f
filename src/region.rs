//! # Region Profile (C1)
//!
//! Pure, side-effect-free frequency and modulation parameters for the two
//! supported regions. Dispatch is a tagged union (`Region`) with static
//! methods rather than a trait object: the reference firmware picks its
//! region at runtime via an enum tag too, and a `match` on a two-variant
//! enum costs nothing extra while staying trivially exhaustive.

use serde::{Deserialize, Serialize};

use crate::error::RegionError;

/// LoRa spreading factor, 7 (fastest) through 12 (slowest, longest range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpreadingFactor(pub u8);

impl SpreadingFactor {
    pub const SF7: SpreadingFactor = SpreadingFactor(7);
    pub const SF8: SpreadingFactor = SpreadingFactor(8);
    pub const SF9: SpreadingFactor = SpreadingFactor(9);
    pub const SF10: SpreadingFactor = SpreadingFactor(10);
    pub const SF11: SpreadingFactor = SpreadingFactor(11);
    pub const SF12: SpreadingFactor = SpreadingFactor(12);
}

/// Supported regional parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Eu868,
    Us915,
}

impl Region {
    /// EU868's three mandatory join channels (zero-indexed 0..=2).
    pub const EU868_JOIN_CHANNEL_MAX: u8 = 2;
    /// US915's 64-channel uplink plan and 8-channel downlink sub-band.
    pub const US915_UPLINK_CHANNEL_MAX: u8 = 63;
    pub const US915_DOWNLINK_CHANNEL_MAX: u8 = 7;

    /// Highest valid uplink channel index for this region.
    pub fn uplink_channel_max(self) -> u8 {
        match self {
            Region::Eu868 => 7,
            Region::Us915 => Self::US915_UPLINK_CHANNEL_MAX,
        }
    }

    /// Uplink frequency in Hz for the given channel.
    pub fn uplink_frequency(self, channel: u8) -> Result<u32, RegionError> {
        match self {
            Region::Eu868 => {
                if channel > 7 {
                    return Err(RegionError::ChannelOutOfRange { channel, max: 7 });
                }
                Ok(eu868_channel_frequency(channel))
            }
            Region::Us915 => {
                if channel > Self::US915_UPLINK_CHANNEL_MAX {
                    return Err(RegionError::ChannelOutOfRange {
                        channel,
                        max: Self::US915_UPLINK_CHANNEL_MAX,
                    });
                }
                Ok(902_300_000 + channel as u32 * 200_000)
            }
        }
    }

    /// Downlink frequency in Hz for the given channel.
    ///
    /// EU868 downlinks mirror the uplink plan (the region's upper-band
    /// mapping applies identically to both directions, per §4.1); US915
    /// downlinks fold the 64-channel uplink plan onto 8 fixed 600 kHz-spaced
    /// channels.
    pub fn downlink_frequency(self, channel: u8) -> Result<u32, RegionError> {
        match self {
            Region::Eu868 => self.uplink_frequency(channel),
            Region::Us915 => {
                let ch = channel % 8;
                Ok(923_300_000 + ch as u32 * 600_000)
            }
        }
    }

    /// RX2 continuous-listen frequency.
    pub fn rx2_frequency(self) -> u32 {
        match self {
            Region::Eu868 => 869_525_000,
            Region::Us915 => 923_300_000,
        }
    }

    /// RX2 spreading factor.
    pub fn rx2_spreading_factor(self) -> SpreadingFactor {
        match self {
            Region::Eu868 => SpreadingFactor::SF12,
            Region::Us915 => SpreadingFactor::SF10,
        }
    }

    /// Uplink/downlink channel bandwidth in Hz (this engine's single-channel
    /// plan uses the 125 kHz lane in both regions).
    pub fn bandwidth_hz(self) -> u32 {
        125_000
    }

    /// Lowest spreading factor usable in this region's 125 kHz lane.
    pub fn min_spreading_factor(self) -> SpreadingFactor {
        SpreadingFactor::SF7
    }

    /// Highest spreading factor usable in this region's 125 kHz lane, used
    /// for join requests to maximize range.
    pub fn max_spreading_factor(self) -> SpreadingFactor {
        SpreadingFactor::SF12
    }

    /// Highest valid (zero-indexed) join channel, EU868 only.
    pub fn join_channel_max(self) -> u8 {
        match self {
            Region::Eu868 => Self::EU868_JOIN_CHANNEL_MAX,
            Region::Us915 => Self::US915_UPLINK_CHANNEL_MAX,
        }
    }
}

/// EU868 channel-to-frequency mapping: the three mandatory join channels
/// are fixed at 868.1/868.3/868.5 MHz; channels beyond that step up from
/// channel 0 at the region's 200 kHz channel spacing (the "upper-band
/// mapping" referenced in §4.1).
fn eu868_channel_frequency(channel: u8) -> u32 {
    const CHANNEL_0: u32 = 868_100_000;
    const STEP: u32 = 200_000;
    match channel {
        0 => 868_100_000,
        1 => 868_300_000,
        2 => 868_500_000,
        ch => CHANNEL_0 + ch as u32 * STEP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eu868_join_channels() {
        assert_eq!(Region::Eu868.uplink_frequency(0).unwrap(), 868_100_000);
        assert_eq!(Region::Eu868.uplink_frequency(1).unwrap(), 868_300_000);
        assert_eq!(Region::Eu868.uplink_frequency(2).unwrap(), 868_500_000);
    }

    #[test]
    fn us915_uplink_endpoints() {
        assert_eq!(Region::Us915.uplink_frequency(0).unwrap(), 902_300_000);
        assert_eq!(
            Region::Us915.uplink_frequency(63).unwrap(),
            902_300_000 + 63 * 200_000
        );
    }

    #[test]
    fn us915_channel_out_of_range() {
        assert!(Region::Us915.uplink_frequency(64).is_err());
    }

    #[test]
    fn us915_downlink_folds_to_eight_channels() {
        assert_eq!(Region::Us915.downlink_frequency(0).unwrap(), 923_300_000);
        assert_eq!(
            Region::Us915.downlink_frequency(8).unwrap(),
            Region::Us915.downlink_frequency(0).unwrap()
        );
    }

    #[test]
    fn eu868_downlink_mirrors_uplink() {
        for ch in 0..=7u8 {
            assert_eq!(
                Region::Eu868.downlink_frequency(ch).unwrap(),
                Region::Eu868.uplink_frequency(ch).unwrap()
            );
        }
    }

    #[test]
    fn rx2_parameters() {
        assert_eq!(Region::Eu868.rx2_frequency(), 869_525_000);
        assert_eq!(Region::Us915.rx2_frequency(), 923_300_000);
    }
}
