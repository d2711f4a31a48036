use crate::domain::model::PlanRequest;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait PlanRequester: Send + Sync {
    /// Short identifier reported by the health endpoint and in logs.
    fn kind(&self) -> &'static str;

    async fn request_plan(&self, request: &PlanRequest) -> Result<String>;
}

#[async_trait]
impl<T: PlanRequester + ?Sized> PlanRequester for Box<T> {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    async fn request_plan(&self, request: &PlanRequest) -> Result<String> {
        (**self).request_plan(request).await
    }
}
