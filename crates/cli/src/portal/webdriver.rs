// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! [`Driver`] over the W3C WebDriver HTTP protocol.
//!
//! Talks to any conforming server (chromedriver, geckodriver, Selenium).
//! Each command is one HTTP round trip; responses carry their payload under
//! `value`, errors as `{"value": {"error": ..., "message": ...}}`.

use std::time::Duration;

use reqwest::Method;
use serde_json::{json, Value};

use super::driver::{Cookie, Driver, DriverError, DriverFuture, DriverResult, Locator, Strategy};

/// Key under which WebDriver returns element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// A live WebDriver browser session.
pub struct WebDriver {
    client: reqwest::Client,
    base_url: String,
    session_id: Option<String>,
}

impl WebDriver {
    /// Start a new browser session on the server at `server_url`.
    pub async fn start(server_url: &str, headless: bool) -> DriverResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(COMMAND_TIMEOUT)
            .build()
            .map_err(|e| DriverError::Connection(e.to_string()))?;
        let mut driver = WebDriver {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
            session_id: None,
        };

        let mut args = vec!["--window-size=1280,1024"];
        if headless {
            args.push("--headless=new");
        }
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let value = driver
            .command(Method::POST, "/session", Some(capabilities))
            .await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| DriverError::Command {
                command: "new session".to_string(),
                message: "response carried no sessionId".to_string(),
            })?
            .to_string();
        tracing::debug!(session = %session_id, headless, "browser session started");
        driver.session_id = Some(session_id);
        Ok(driver)
    }

    fn session_path(&self, suffix: &str) -> DriverResult<String> {
        let id = self.session_id.as_deref().ok_or(DriverError::NoSession)?;
        Ok(format!("/session/{}{}", id, suffix))
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> DriverResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!(method = %method, path, "webdriver command");
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| DriverError::Connection(e.to_string()))?;
        let status = response.status();
        let payload: Value = response.json().await.map_err(|e| DriverError::Command {
            command: path.to_string(),
            message: format!("unreadable response: {}", e),
        })?;
        let value = payload.get("value").cloned().unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(value);
        }
        let error = value.get("error").and_then(Value::as_str).unwrap_or("unknown error");
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Err(match error {
            "no such element" | "stale element reference" => DriverError::NoSuchElement(message),
            "invalid session id" => DriverError::NoSession,
            _ => DriverError::Command {
                command: path.to_string(),
                message: format!("{}: {}", error, message),
            },
        })
    }

    async fn session_command(
        &self,
        method: Method,
        suffix: &str,
        body: Option<Value>,
    ) -> DriverResult<Value> {
        let path = self.session_path(suffix)?;
        self.command(method, &path, body).await
    }

    async fn find(&self, locator: &Locator) -> DriverResult<String> {
        let value = self
            .session_command(Method::POST, "/element", Some(locator_body(locator)))
            .await
            .map_err(|e| match e {
                DriverError::NoSuchElement(_) => DriverError::NoSuchElement(locator.to_string()),
                other => other,
            })?;
        element_id(&value).ok_or_else(|| DriverError::NoSuchElement(locator.to_string()))
    }

    async fn element_flag(&self, locator: &Locator, flag: &str) -> DriverResult<bool> {
        let id = self.find(locator).await?;
        let value = self
            .session_command(Method::GET, &format!("/element/{}/{}", id, flag), None)
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn choose(&self, locator: &Locator, option: &str) -> DriverResult<()> {
        let unavailable = |reason: &str| DriverError::OptionUnavailable {
            locator: locator.to_string(),
            option: option.to_string(),
            reason: reason.to_string(),
        };

        let select = self.find(locator).await?;
        let child = json!({
            "using": Strategy::XPath.using(),
            "value": format!(".//option[normalize-space()={}]", xpath_literal(option)),
        });
        let found = self
            .session_command(Method::POST, &format!("/element/{}/element", select), Some(child))
            .await;
        let option_id = match found {
            Ok(value) => element_id(&value).ok_or_else(|| unavailable("not listed"))?,
            Err(DriverError::NoSuchElement(_)) => return Err(unavailable("not listed")),
            Err(e) => return Err(e),
        };

        let enabled = self
            .session_command(Method::GET, &format!("/element/{}/enabled", option_id), None)
            .await?;
        if !enabled.as_bool().unwrap_or(false) {
            return Err(unavailable("disabled"));
        }
        self.session_command(Method::POST, &format!("/element/{}/click", option_id), Some(json!({})))
            .await?;
        Ok(())
    }
}

fn locator_body(locator: &Locator) -> Value {
    json!({ "using": locator.strategy().using(), "value": locator.value() })
}

fn element_id(value: &Value) -> Option<String> {
    value.get(ELEMENT_KEY).and_then(Value::as_str).map(str::to_string)
}

/// Quote `text` as an XPath string literal.
pub(crate) fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{}'", text)
    } else if !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        let parts: Vec<String> = text.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

impl Driver for WebDriver {
    fn navigate<'a>(&'a mut self, url: &'a str) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            tracing::debug!(url, "navigate");
            self.session_command(Method::POST, "/url", Some(json!({ "url": url })))
                .await?;
            Ok(())
        })
    }

    fn is_present<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, bool> {
        Box::pin(async move {
            let value = self
                .session_command(Method::POST, "/elements", Some(locator_body(locator)))
                .await?;
            Ok(value.as_array().is_some_and(|items| !items.is_empty()))
        })
    }

    fn is_displayed<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, bool> {
        Box::pin(async move { self.element_flag(locator, "displayed").await })
    }

    fn is_enabled<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, bool> {
        Box::pin(async move { self.element_flag(locator, "enabled").await })
    }

    fn click<'a>(&'a mut self, locator: &'a Locator) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            let id = self.find(locator).await?;
            self.session_command(Method::POST, &format!("/element/{}/click", id), Some(json!({})))
                .await?;
            Ok(())
        })
    }

    fn fill<'a>(&'a mut self, locator: &'a Locator, text: &'a str) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            let id = self.find(locator).await?;
            self.session_command(Method::POST, &format!("/element/{}/clear", id), Some(json!({})))
                .await?;
            self.session_command(
                Method::POST,
                &format!("/element/{}/value", id),
                Some(json!({ "text": text })),
            )
            .await?;
            Ok(())
        })
    }

    fn select_option<'a>(
        &'a mut self,
        locator: &'a Locator,
        option: &'a str,
    ) -> DriverFuture<'a, ()> {
        Box::pin(async move { self.choose(locator, option).await })
    }

    fn cookies(&mut self) -> DriverFuture<'_, Vec<Cookie>> {
        Box::pin(async move {
            let value = self.session_command(Method::GET, "/cookie", None).await?;
            serde_json::from_value(value).map_err(|e| DriverError::Command {
                command: "get cookies".to_string(),
                message: e.to_string(),
            })
        })
    }

    fn add_cookies<'a>(&'a mut self, cookies: &'a [Cookie]) -> DriverFuture<'a, ()> {
        Box::pin(async move {
            for cookie in cookies {
                self.session_command(Method::POST, "/cookie", Some(json!({ "cookie": cookie })))
                    .await?;
            }
            Ok(())
        })
    }

    fn quit(&mut self) -> DriverFuture<'_, ()> {
        Box::pin(async move {
            let path = self.session_path("")?;
            self.session_id = None;
            self.command(Method::DELETE, &path, None).await?;
            tracing::debug!("browser session closed");
            Ok(())
        })
    }
}
