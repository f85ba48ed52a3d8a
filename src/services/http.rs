//! REST client for a remote task collection

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info};

use super::TaskApi;
use crate::{
    error::ApiError,
    state::{NewTask, Task, TaskId},
};

/// Task API backed by a JSON collection endpoint.
///
/// `GET`/`POST` go to the collection URL, `PUT`/`DELETE` to `{url}/{id}`.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    collection_url: String,
}

impl HttpTaskApi {
    pub fn new(collection_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let collection_url = collection_url.trim_end_matches('/').to_string();
        info!("Using remote task API at {}", collection_url);
        Ok(Self { client, collection_url })
    }

    fn task_url(&self, id: &TaskId) -> String {
        format!("{}/{}", self.collection_url, id)
    }
}

/// Turn non-2xx responses into `ApiError::Status`
fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.client.get(&self.collection_url).send().await?;
        let tasks: Vec<Task> = check(response)?.json().await?;
        debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn create_task(&self, title: &str) -> Result<Task, ApiError> {
        let response = self
            .client
            .post(&self.collection_url)
            .json(&NewTask::titled(title))
            .send()
            .await?;
        let task: Task = check(response)?.json().await?;
        debug!("Created task {}", task.id);
        Ok(task)
    }

    async fn complete_task(&self, task: &Task) -> Result<(), ApiError> {
        let body = Task {
            completed: true,
            ..task.clone()
        };
        let response = self
            .client
            .put(self.task_url(&task.id))
            .json(&body)
            .send()
            .await?;
        check(response)?;
        debug!("Completed task {}", task.id);
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let response = self.client.delete(self.task_url(id)).send().await?;
        check(response)?;
        debug!("Deleted task {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn client(server: &mockito::ServerGuard) -> HttpTaskApi {
        HttpTaskApi::new(&format!("{}/tasks/", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetch_tasks_parses_collection() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tasks")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"title":"Plan","completed":false},{"id":2,"title":"Ship","completed":true}]"#)
            .create_async()
            .await;

        let tasks = client(&server).fetch_tasks().await.unwrap();

        mock.assert_async().await;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, TaskId::new("1"));
        assert!(tasks[1].completed);
    }

    #[tokio::test]
    async fn create_task_posts_open_task() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tasks")
            .match_body(Matcher::Json(json!({"title": "Write", "completed": false})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":9,"title":"Write","completed":false}"#)
            .create_async()
            .await;

        let task = client(&server).create_task("Write").await.unwrap();

        mock.assert_async().await;
        assert_eq!(task, Task::new("9", "Write"));
    }

    #[tokio::test]
    async fn complete_task_puts_completed_flag() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/tasks/4")
            .match_body(Matcher::PartialJson(json!({"completed": true})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        client(&server).complete_task(&Task::new("4", "Read")).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_failure_maps_to_status_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/tasks/5")
            .with_status(500)
            .create_async()
            .await;

        let err = client(&server).delete_task(&TaskId::new("5")).await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }
}
