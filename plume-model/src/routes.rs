macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned routes of the preferences service
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod preferences {
        pub const SNAPSHOT: &str = v1_path!("/preferences");
        pub const ADULT_CONTENT: &str =
            v1_path!("/preferences/adult-content");
        pub const CONTENT_LABELS: &str =
            v1_path!("/preferences/content-labels");
    }
}
