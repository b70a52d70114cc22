//! Game resources: raid zones and their Warcraft Logs identifiers.

/// Classic raid instances that have gear check channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaidZone {
    MoltenCore,
    BlackwingLair,
    AhnQiraj,
    Naxxramas,
}

impl RaidZone {
    pub const ALL: [RaidZone; 4] = [
        Self::MoltenCore,
        Self::BlackwingLair,
        Self::AhnQiraj,
        Self::Naxxramas,
    ];

    /// Look up a zone by its channel prefix (`mc`, `bwl`, `aq40`, `naxx`).
    pub fn from_channel_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|zone| zone.channel_prefix().eq_ignore_ascii_case(prefix))
    }

    pub fn channel_prefix(&self) -> &'static str {
        match self {
            Self::MoltenCore => "mc",
            Self::BlackwingLair => "bwl",
            Self::AhnQiraj => "aq40",
            Self::Naxxramas => "naxx",
        }
    }

    /// Zone id used by Warcraft Logs to scope parses.
    pub fn id(&self) -> u32 {
        match self {
            Self::MoltenCore => 1000,
            Self::BlackwingLair => 1002,
            Self::AhnQiraj => 1005,
            Self::Naxxramas => 1006,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MoltenCore => "Molten Core",
            Self::BlackwingLair => "Blackwing Lair",
            Self::AhnQiraj => "Temple of Ahn'Qiraj",
            Self::Naxxramas => "Naxxramas",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_lookup() {
        assert_eq!(RaidZone::from_channel_prefix("mc"), Some(RaidZone::MoltenCore));
        assert_eq!(RaidZone::from_channel_prefix("BWL"), Some(RaidZone::BlackwingLair));
        assert_eq!(RaidZone::from_channel_prefix("aq40"), Some(RaidZone::AhnQiraj));
        assert_eq!(RaidZone::from_channel_prefix("naxx"), Some(RaidZone::Naxxramas));
        assert_eq!(RaidZone::from_channel_prefix("zg"), None);
        assert_eq!(RaidZone::from_channel_prefix(""), None);
    }

    #[test]
    fn test_zone_ids() {
        assert_eq!(RaidZone::MoltenCore.id(), 1000);
        assert_eq!(RaidZone::BlackwingLair.id(), 1002);
        assert_eq!(RaidZone::AhnQiraj.id(), 1005);
        assert_eq!(RaidZone::Naxxramas.id(), 1006);
    }
}
