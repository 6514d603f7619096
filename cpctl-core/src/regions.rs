//! Regions the control-plane service is available in.
//!
//! Multi-region enumeration treats each entry as an independent partition.

pub const DEFAULT_REGION: &str = "us-west-2";

pub const SUPPORTED_REGIONS: [&str; 9] = [
    "us-west-2",
    "us-east-1",
    "us-east-2",
    "eu-west-1",
    "eu-north-1",
    "eu-central-1",
    "ap-northeast-1",
    "ap-southeast-1",
    "ap-southeast-2",
];

pub fn supported_regions() -> Vec<String> {
    SUPPORTED_REGIONS.iter().map(|s| s.to_string()).collect()
}

pub fn is_supported_region(region: &str) -> bool {
    SUPPORTED_REGIONS.contains(&region)
}
