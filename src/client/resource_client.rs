use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Client, ClientError, RequestOptions, Response};
use crate::context::Context;
use crate::resourceids::ResourceId;

/// A typed client for one resource type at one API version.
pub struct ResourceClient<Id, M> {
    client: Client,
    api_version: &'static str,
    _marker: PhantomData<fn() -> (Id, M)>,
}

impl<Id, M> Clone for ResourceClient<Id, M> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_version: self.api_version,
            _marker: PhantomData,
        }
    }
}

impl<Id, M> std::fmt::Debug for ResourceClient<Id, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("client", &self.client)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl<Id, M> ResourceClient<Id, M>
where
    Id: ResourceId,
    M: Serialize + DeserializeOwned,
{
    pub fn new(client: Client, api_version: &'static str) -> Self {
        Self {
            client,
            api_version,
            _marker: PhantomData,
        }
    }

    pub fn api_version(&self) -> &'static str {
        self.api_version
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn get(&self, ctx: &Context, id: &Id) -> Result<M, ClientError> {
        let path = id.id();
        let response = self
            .client
            .send(ctx, RequestOptions::new(Method::GET, &path, self.api_version))
            .await?;
        response.model()
    }

    pub async fn create_or_update(
        &self,
        ctx: &Context,
        id: &Id,
        model: &M,
    ) -> Result<Response, ClientError> {
        let path = id.id();
        let options = RequestOptions::new(Method::PUT, &path, self.api_version)
            .with_body(serde_json::to_value(model)?)
            .expect_status_codes(&[200, 201, 202]);
        self.client.send(ctx, options).await
    }

    pub async fn create_or_update_then_poll(
        &self,
        ctx: &Context,
        id: &Id,
        model: &M,
    ) -> Result<(), ClientError> {
        let response = self.create_or_update(ctx, id, model).await?;
        self.client.wait_for_completion(ctx, &response).await
    }

    /// PATCHes `patch`, which is usually a partial model.
    pub async fn update_then_poll<P: Serialize>(
        &self,
        ctx: &Context,
        id: &Id,
        patch: &P,
    ) -> Result<(), ClientError> {
        let path = id.id();
        let options = RequestOptions::new(Method::PATCH, &path, self.api_version)
            .with_body(serde_json::to_value(patch)?)
            .expect_status_codes(&[200, 201, 202]);
        let response = self.client.send(ctx, options).await?;
        self.client.wait_for_completion(ctx, &response).await
    }

    pub async fn delete(&self, ctx: &Context, id: &Id) -> Result<Response, ClientError> {
        let path = id.id();
        let options = RequestOptions::new(Method::DELETE, &path, self.api_version)
            .expect_status_codes(&[200, 202, 204]);
        self.client.send(ctx, options).await
    }

    pub async fn delete_then_poll(&self, ctx: &Context, id: &Id) -> Result<(), ClientError> {
        let response = self.delete(ctx, id).await?;
        self.client.wait_for_completion(ctx, &response).await
    }

    /// POSTs to `{id}/{action}`, e.g. `purge`.
    pub async fn post(
        &self,
        ctx: &Context,
        id: &Id,
        action: &str,
        body: Option<Value>,
    ) -> Result<Response, ClientError> {
        let path = format!("{}/{}", id.id(), action);
        let mut options = RequestOptions::new(Method::POST, &path, self.api_version)
            .expect_status_codes(&[200, 202, 204]);
        if let Some(body) = body {
            options = options.with_body(body);
        }
        self.client.send(ctx, options).await
    }

    pub async fn post_then_poll(
        &self,
        ctx: &Context,
        id: &Id,
        action: &str,
        body: Option<Value>,
    ) -> Result<(), ClientError> {
        let response = self.post(ctx, id, action, body).await?;
        self.client.wait_for_completion(ctx, &response).await
    }

    /// Lists every `M` under `path`, following `nextLink`.
    pub async fn list_complete(&self, ctx: &Context, path: &str) -> Result<Vec<M>, ClientError> {
        self.client.list_complete(ctx, path, self.api_version).await
    }
}
