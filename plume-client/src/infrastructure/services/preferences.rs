use std::sync::Arc;

use async_trait::async_trait;
use plume_model::api::{
    AdultContentUpdate, ContentLabelUpdate, PreferencesSnapshot,
};
use plume_model::routes::v1;
use plume_model::{LabelGroup, LabelPreference};

use crate::errors::RemoteResult;
use crate::infrastructure::api_client::ApiClient;

/// Remote authority of record for moderation preferences
#[async_trait]
pub trait PreferencesService: Send + Sync {
    /// Full snapshot of the user's preferences
    async fn fetch_preferences(&self) -> RemoteResult<PreferencesSnapshot>;

    async fn put_adult_content_enabled(&self, enabled: bool) -> RemoteResult<()>;

    async fn put_content_label_pref(
        &self,
        group: LabelGroup,
        pref: LabelPreference,
    ) -> RemoteResult<()>;
}

#[derive(Clone, Debug)]
pub struct PreferencesApiAdapter {
    client: Arc<ApiClient>,
}

impl PreferencesApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PreferencesService for PreferencesApiAdapter {
    async fn fetch_preferences(&self) -> RemoteResult<PreferencesSnapshot> {
        self.client.get(v1::preferences::SNAPSHOT).await
    }

    async fn put_adult_content_enabled(&self, enabled: bool) -> RemoteResult<()> {
        self.client
            .put_no_content(
                v1::preferences::ADULT_CONTENT,
                &AdultContentUpdate { enabled },
            )
            .await
    }

    async fn put_content_label_pref(
        &self,
        group: LabelGroup,
        pref: LabelPreference,
    ) -> RemoteResult<()> {
        self.client
            .put_no_content(
                v1::preferences::CONTENT_LABELS,
                &ContentLabelUpdate { group, value: pref },
            )
            .await
    }
}
