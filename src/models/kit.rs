use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kit {
    pub id: String,
    pub name: String,
    pub quantity_total: u32,
    pub quantity_available: u32,
    pub deposit_amount: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl Kit {
    /// A kit whose counts are inconsistent is treated as unavailable.
    pub fn is_available(&self) -> bool {
        self.quantity_available > 0 && self.quantity_available <= self.quantity_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kit(available: u32, total: u32) -> Kit {
        Kit {
            id: "kit-1".to_string(),
            name: "Arduino starter".to_string(),
            quantity_total: total,
            quantity_available: available,
            deposit_amount: 150_000,
            description: None,
        }
    }

    #[test]
    fn test_is_available() {
        assert!(kit(1, 3).is_available());
        assert!(kit(3, 3).is_available());
        assert!(!kit(0, 3).is_available());
    }

    #[test]
    fn test_available_above_total_is_unavailable() {
        assert!(!kit(4, 3).is_available());
        assert!(!kit(1, 0).is_available());
    }
}
