use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, FixedOffset, TimeDelta};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::config::ConfigStore;
use crate::error::jira_error::{
    EmailNotConfiguredSnafu, LogTimeFailedSnafu, OriginNotConfiguredSnafu, ParseResponseSnafu,
    RequestFailedSnafu, TokenEnvEmptySnafu, TokenNotConfiguredSnafu, TransportSnafu,
};
use crate::error::JiraError;
use crate::jira::worklogs::{format_time_spent, LoggedTime, TaskLog};
use crate::jira::{Issue, WorklogClient};
use crate::resolve::TaskKey;

const STARTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
const SEARCH_ENDPOINT: &str = "/rest/api/3/search/jql";
const ASSIGNED_JQL: &str = "assignee = currentUser() AND status not in (Done, Closed)";
const MAX_RESULTS: u32 = 100;

/// Connection settings, taken from the user config.
#[derive(Debug, Clone, Default)]
pub struct JiraSettings {
    pub origin: String,
    pub email: String,
    pub token: String,
    pub token_env_name: String,
}

impl JiraSettings {
    pub fn from_config(config: &dyn ConfigStore) -> Self {
        Self {
            origin: config.jira_origin().to_string(),
            email: config.jira_email().to_string(),
            token: config.jira_token().to_string(),
            token_env_name: config.jira_token_env_name().to_string(),
        }
    }
}

/// Jira REST v3 client over blocking HTTP.
pub struct HttpJiraClient {
    settings: JiraSettings,
    agent: ureq::Agent,
}

impl HttpJiraClient {
    pub fn new(settings: JiraSettings) -> Self {
        Self {
            settings,
            agent: ureq::agent(),
        }
    }

    fn credentials(&self) -> Result<Credentials, JiraError> {
        let settings = &self.settings;
        if settings.email.is_empty() {
            return EmailNotConfiguredSnafu.fail();
        }

        let token = if settings.token_env_name.is_empty() {
            settings.token.clone()
        } else {
            let token = std::env::var(&settings.token_env_name).unwrap_or_default();
            if token.is_empty() {
                return TokenEnvEmptySnafu {
                    name: settings.token_env_name.as_str(),
                }
                .fail();
            }
            token
        };
        if token.is_empty() {
            return TokenNotConfiguredSnafu.fail();
        }

        if settings.origin.is_empty() {
            return OriginNotConfiguredSnafu.fail();
        }
        let origin = settings.origin.trim_end_matches('/');
        let base_url = if origin.starts_with("https://") || origin.starts_with("http://") {
            origin.to_string()
        } else {
            format!("https://{origin}")
        };

        Ok(Credentials {
            base_url,
            authorization: basic_auth(&settings.email, &token),
        })
    }

    fn post(
        &self,
        creds: &Credentials,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<Reply, JiraError> {
        let url = format!("{}{endpoint}", creds.base_url);
        tracing::debug!(%url, "POST");
        let result = self
            .agent
            .post(&url)
            .set("Authorization", &creds.authorization)
            .set("Accept", "application/json")
            .send_json(body);
        Reply::from_result(result)
    }

    fn get(
        &self,
        creds: &Credentials,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Reply, JiraError> {
        let url = format!("{}{endpoint}", creds.base_url);
        tracing::debug!(%url, "GET");
        let mut request = self
            .agent
            .get(&url)
            .set("Authorization", &creds.authorization)
            .set("Accept", "application/json");
        for (name, value) in query {
            request = request.query(name, value);
        }
        Reply::from_result(request.call())
    }

    fn search(
        &self,
        creds: &Credentials,
        jql: String,
        fields: &[&str],
    ) -> Result<Vec<ApiIssue>, JiraError> {
        let request = SearchRequest {
            jql,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            max_results: MAX_RESULTS,
            fields_by_keys: true,
        };
        let reply = self.post(creds, SEARCH_ENDPOINT, &request)?;
        if reply.status != 200 {
            return RequestFailedSnafu {
                what: "issues",
                status: reply.status,
                body: reply.body,
            }
            .fail();
        }
        let response: SearchResponse = reply.json()?;
        Ok(response.issues)
    }

    /// Worklogs of one issue authored by the configured user since `since`.
    fn issue_worklogs(
        &self,
        creds: &Credentials,
        issue: &ApiIssue,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<(TaskLog, DateTime<FixedOffset>)>, JiraError> {
        let endpoint = format!("/rest/api/3/issue/{}/worklog", issue.key);
        let started_after = since.timestamp_millis().to_string();
        let reply = self.get(creds, &endpoint, &[("startedAfter", started_after.as_str())])?;
        if reply.status != 200 {
            return RequestFailedSnafu {
                what: format!("worklogs of {}", issue.key),
                status: reply.status,
                body: reply.body,
            }
            .fail();
        }
        let page: WorklogPage = reply.json()?;

        let mut entries = Vec::new();
        for worklog in page.worklogs {
            let mine = worklog
                .author
                .as_ref()
                .and_then(|a| a.email_address.as_deref())
                .is_some_and(|email| email.eq_ignore_ascii_case(&self.settings.email));
            if !mine {
                continue;
            }
            let started = match DateTime::parse_from_str(&worklog.started, STARTED_FORMAT) {
                Ok(started) => started,
                Err(e) => {
                    tracing::warn!(issue = %issue.key, "skipping worklog with bad start {:?}: {e}", worklog.started);
                    continue;
                }
            };
            if started < since {
                continue;
            }
            let Some(logged_time) = TimeDelta::try_seconds(worklog.time_spent_seconds) else {
                tracing::warn!(issue = %issue.key, "skipping worklog with time spent out of range: {}s", worklog.time_spent_seconds);
                continue;
            };
            entries.push((
                TaskLog {
                    task_key: issue.key.clone(),
                    summary: issue.fields.summary.clone(),
                    logged_time,
                },
                started,
            ));
        }
        Ok(entries)
    }
}

impl WorklogClient for HttpJiraClient {
    fn log_time(
        &self,
        task: &TaskKey,
        duration: TimeDelta,
        started: DateTime<FixedOffset>,
        comment: &str,
    ) -> Result<(), JiraError> {
        let creds = self.credentials()?;
        let worklog = WorklogRequest {
            time_spent: format_time_spent(duration),
            started: started.format(STARTED_FORMAT).to_string(),
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        };
        let endpoint = format!("/rest/api/3/issue/{task}/worklog");
        let reply = self.post(&creds, &endpoint, &worklog)?;
        if reply.status != 201 {
            tracing::warn!(status = reply.status, task = %task, "worklog rejected");
            return LogTimeFailedSnafu {
                status: reply.status,
                body: reply.body,
            }
            .fail();
        }
        tracing::info!(task = %task, time_spent = %worklog.time_spent, "worklog created");
        Ok(())
    }

    fn assigned_issues(&self) -> Result<Vec<Issue>, JiraError> {
        let creds = self.credentials()?;
        let issues = self.search(
            &creds,
            ASSIGNED_JQL.to_string(),
            &["key", "summary", "status", "assignee"],
        )?;
        Ok(issues
            .into_iter()
            .map(|issue| Issue {
                key: issue.key,
                summary: issue.fields.summary,
                status: issue.fields.status.map(|s| s.name).unwrap_or_default(),
            })
            .collect())
    }

    fn logged_time(&self, since: DateTime<FixedOffset>) -> Result<LoggedTime, JiraError> {
        let creds = self.credentials()?;
        let jql = format!(
            "worklogAuthor = currentUser() AND worklogDate >= \"{}\"",
            since.format("%Y-%m-%d")
        );
        let issues = self.search(&creds, jql, &["key", "summary"])?;
        tracing::debug!(count = issues.len(), "fetching worklogs");

        // One fetch per issue; all of them finish before aggregation.
        let fetched: Vec<_> = issues
            .par_iter()
            .filter_map(|issue| match self.issue_worklogs(&creds, issue, since) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    tracing::warn!(issue = %issue.key, "failed to fetch worklogs: {e}");
                    None
                }
            })
            .collect();

        let mut logged = LoggedTime::default();
        for (log, started) in fetched.into_iter().flatten() {
            logged.add(log, started);
        }
        Ok(logged)
    }
}

struct Credentials {
    base_url: String,
    authorization: String,
}

/// Status and body of a finished HTTP exchange, whatever the status.
struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    fn from_result(result: Result<ureq::Response, ureq::Error>) -> Result<Self, JiraError> {
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(t)) => {
                return Err(Box::new(t)).context(TransportSnafu);
            }
        };
        let status = response.status();
        let body = response.into_string().map_err(|e| {
            ParseResponseSnafu {
                message: format!("failed to read response body: {e}"),
            }
            .build()
        })?;
        Ok(Self { status, body })
    }

    fn json<T: DeserializeOwned>(&self) -> Result<T, JiraError> {
        serde_json::from_str(&self.body).map_err(|e| {
            ParseResponseSnafu {
                message: e.to_string(),
            }
            .build()
        })
    }
}

// -- Jira API request/response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorklogRequest {
    time_spent: String,
    started: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    jql: String,
    fields: Vec<String>,
    max_results: u32,
    fields_by_keys: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<ApiIssue>,
}

#[derive(Deserialize)]
struct ApiIssue {
    key: String,
    fields: ApiFields,
}

#[derive(Deserialize)]
struct ApiFields {
    #[serde(default)]
    summary: String,
    status: Option<ApiStatus>,
}

#[derive(Deserialize)]
struct ApiStatus {
    name: String,
}

#[derive(Deserialize)]
struct WorklogPage {
    #[serde(default)]
    worklogs: Vec<ApiWorklog>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiWorklog {
    author: Option<ApiAuthor>,
    started: String,
    time_spent_seconds: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAuthor {
    email_address: Option<String>,
}

fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn read_request(stream: &mut TcpStream) -> String {
        let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    /// Serve the given responses, one connection each, and hand back the
    /// raw requests received.
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    break;
                };
                requests.push(read_request(&mut stream));
                let resp = format!(
                    "HTTP/1.1 {status} Whatever\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(resp.as_bytes());
            }
            requests
        });
        (format!("http://{addr}"), handle)
    }

    fn settings(origin: &str) -> JiraSettings {
        JiraSettings {
            origin: origin.to_string(),
            email: "user@example.com".to_string(),
            token: "token123".to_string(),
            token_env_name: String::new(),
        }
    }

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn basic_auth_header() {
        assert_eq!(
            basic_auth("Aladdin", "open sesame"),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn log_time_posts_worklog() {
        let (url, handle) = serve(vec![(201, "{}")]);
        let client = HttpJiraClient::new(settings(&url));
        client
            .log_time(
                &TaskKey::from_stored("TEST-123"),
                TimeDelta::minutes(90),
                at("2025-01-04T14:00:00+01:00"),
                "Working on task",
            )
            .unwrap();

        let requests = handle.join().unwrap();
        let request = &requests[0];
        assert!(request.starts_with("POST /rest/api/3/issue/TEST-123/worklog "));
        assert!(request.contains(&basic_auth("user@example.com", "token123")));
        assert!(request.contains("\"timeSpent\":\"1h 30m\""));
        assert!(request.contains("\"started\":\"2025-01-04T14:00:00.000+0100\""));
        assert!(request.contains("\"comment\":\"Working on task\""));
    }

    #[test]
    fn log_time_omits_empty_comment() {
        let (url, handle) = serve(vec![(201, "{}")]);
        let client = HttpJiraClient::new(settings(&url));
        client
            .log_time(
                &TaskKey::from_stored("TEST-1"),
                TimeDelta::hours(1),
                at("2025-01-04T14:00:00Z"),
                "",
            )
            .unwrap();
        let requests = handle.join().unwrap();
        assert!(!requests[0].contains("comment"));
    }

    #[test]
    fn log_time_failure_carries_body() {
        let (url, handle) = serve(vec![(400, "Bad Request")]);
        let client = HttpJiraClient::new(settings(&url));
        let err = client
            .log_time(
                &TaskKey::from_stored("TEST-123"),
                TimeDelta::hours(1),
                at("2025-01-04T14:00:00Z"),
                "Logging failed task",
            )
            .unwrap_err();
        handle.join().unwrap();
        assert!(matches!(err, JiraError::LogTimeFailed { status: 400, .. }));
        assert_eq!(err.to_string(), "failed to log time: Bad Request");
    }

    #[test]
    fn ok_instead_of_created_is_a_failure() {
        let (url, handle) = serve(vec![(200, "{}")]);
        let client = HttpJiraClient::new(settings(&url));
        let err = client
            .log_time(
                &TaskKey::from_stored("TEST-123"),
                TimeDelta::hours(1),
                at("2025-01-04T14:00:00Z"),
                "",
            )
            .unwrap_err();
        handle.join().unwrap();
        assert!(matches!(err, JiraError::LogTimeFailed { status: 200, .. }));
    }

    #[test]
    fn assigned_issues_parses_search() {
        let body = r#"{
            "issues": [
                {"key": "ISSUE-1", "fields": {"summary": "Fix bug", "status": {"name": "In Progress"}}},
                {"key": "ISSUE-2", "fields": {"summary": "Add feature", "status": {"name": "To Do"}}}
            ]
        }"#;
        let (url, handle) = serve(vec![(200, body)]);
        let client = HttpJiraClient::new(settings(&url));
        let issues = client.assigned_issues().unwrap();
        let requests = handle.join().unwrap();

        assert!(requests[0].starts_with("POST /rest/api/3/search/jql "));
        assert!(requests[0].contains("assignee = currentUser()"));
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0],
            Issue {
                key: "ISSUE-1".to_string(),
                summary: "Fix bug".to_string(),
                status: "In Progress".to_string(),
            }
        );
    }

    #[test]
    fn logged_time_aggregates_own_worklogs() {
        let search = r#"{"issues": [{"key": "ISSUE-1", "fields": {"summary": "Fix bug"}}]}"#;
        let worklogs = r#"{"worklogs": [
            {"author": {"emailAddress": "user@example.com"}, "started": "2025-01-04T09:00:00.000+0000", "timeSpentSeconds": 3600},
            {"author": {"emailAddress": "USER@example.com"}, "started": "2025-01-04T13:00:00.000+0000", "timeSpentSeconds": 1800},
            {"author": {"emailAddress": "other@example.com"}, "started": "2025-01-04T10:00:00.000+0000", "timeSpentSeconds": 7200},
            {"author": {"emailAddress": "user@example.com"}, "started": "2025-01-02T10:00:00.000+0000", "timeSpentSeconds": 600}
        ]}"#;
        let (url, handle) = serve(vec![(200, search), (200, worklogs)]);
        let client = HttpJiraClient::new(settings(&url));
        let logged = client.logged_time(at("2025-01-03T00:00:00Z")).unwrap();
        let requests = handle.join().unwrap();

        assert!(requests[0].contains("worklogDate >= \\\"2025-01-03\\\""));
        assert!(requests[1].starts_with("GET /rest/api/3/issue/ISSUE-1/worklog?startedAfter="));
        assert_eq!(logged.days.len(), 1);
        assert_eq!(logged.days[0].time_logged, TimeDelta::minutes(90));
        assert_eq!(logged.days[0].worklogs[0].summary, "Fix bug");
    }

    #[test]
    fn logged_time_skips_out_of_range_time_spent() {
        let search = r#"{"issues": [{"key": "ISSUE-1", "fields": {"summary": "Fix bug"}}]}"#;
        let worklogs = r#"{"worklogs": [
            {"author": {"emailAddress": "user@example.com"}, "started": "2025-01-04T09:00:00.000+0000", "timeSpentSeconds": 9223372036854775807},
            {"author": {"emailAddress": "user@example.com"}, "started": "2025-01-04T11:00:00.000+0000", "timeSpentSeconds": 900}
        ]}"#;
        let (url, handle) = serve(vec![(200, search), (200, worklogs)]);
        let client = HttpJiraClient::new(settings(&url));
        let logged = client.logged_time(at("2025-01-03T00:00:00Z")).unwrap();
        handle.join().unwrap();

        assert_eq!(logged.days.len(), 1);
        assert_eq!(logged.days[0].time_logged, TimeDelta::minutes(15));
    }

    #[test]
    fn logged_time_skips_failed_issue() {
        let search = r#"{"issues": [{"key": "ISSUE-1", "fields": {"summary": "Fix bug"}}]}"#;
        let (url, handle) = serve(vec![(200, search), (500, "boom")]);
        let client = HttpJiraClient::new(settings(&url));
        let logged = client.logged_time(at("2025-01-03T00:00:00Z")).unwrap();
        handle.join().unwrap();
        assert!(logged.is_empty());
    }

    #[test]
    fn missing_configuration_is_reported_before_any_request() {
        let mut s = settings("jira.example.com");
        s.email.clear();
        let err = HttpJiraClient::new(s).assigned_issues().unwrap_err();
        assert!(matches!(err, JiraError::EmailNotConfigured { .. }));

        let mut s = settings("jira.example.com");
        s.token.clear();
        let err = HttpJiraClient::new(s).assigned_issues().unwrap_err();
        assert!(matches!(err, JiraError::TokenNotConfigured { .. }));

        let err = HttpJiraClient::new(settings("")).assigned_issues().unwrap_err();
        assert!(matches!(err, JiraError::OriginNotConfigured { .. }));
    }

    #[test]
    fn token_env_name_must_resolve() {
        let mut s = settings("jira.example.com");
        s.token_env_name = "LOGIT_TEST_TOKEN_THAT_IS_NEVER_SET".to_string();
        let err = HttpJiraClient::new(s).assigned_issues().unwrap_err();
        assert!(matches!(err, JiraError::TokenEnvEmpty { ref name, .. } if name == "LOGIT_TEST_TOKEN_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn origin_without_scheme_gets_https() {
        let client = HttpJiraClient::new(settings("jira.example.com/"));
        let creds = client.credentials().unwrap();
        assert_eq!(creds.base_url, "https://jira.example.com");
    }

    #[test]
    fn transport_errors_are_reported() {
        // Nothing listens on a freshly closed port.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let client = HttpJiraClient::new(settings(&format!("http://127.0.0.1:{port}")));
        let err = client.assigned_issues().unwrap_err();
        assert!(matches!(err, JiraError::Transport { .. }));
    }
}
