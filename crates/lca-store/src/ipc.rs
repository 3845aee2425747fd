//! JSON-RPC client for an openLCA-style IPC server.

use std::time::Duration;

use lca_core::{LinkingOptions, ProviderLinking};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::model::{Flow, ModelType, Process, Ref};
use crate::{ModelStore, StoreError, StoreResult};

/// Blocking client holding the single connection used for a run.
pub struct IpcClient {
    http: Client,
    endpoint: String,
    next_id: u64,
}

impl IpcClient {
    /// Build a client for `http://{host}:{port}`. No request is made until
    /// the first call.
    pub fn connect(host: &str, port: u16, timeout: Option<Duration>) -> StoreResult<Self> {
        let endpoint = format!("http://{host}:{port}");
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| StoreError::Connection {
            endpoint: endpoint.clone(),
            message: format!("failed to build http client: {e}"),
        })?;
        Ok(Self {
            http,
            endpoint,
            next_id: 1,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn call<T: DeserializeOwned>(&mut self, method: &str, params: Value) -> StoreResult<T> {
        let id = self.next_id;
        self.next_id += 1;
        debug!(method, id, "ipc request");

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&request_body(id, method, params))
            .send()
            .map_err(|e| StoreError::Connection {
                endpoint: self.endpoint.clone(),
                message: format!("{e} (is the IPC server running?)"),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(StoreError::Connection {
                endpoint: self.endpoint.clone(),
                message: format!("http error {status}: {text}"),
            });
        }

        let body: Value = resp
            .json()
            .map_err(|e| StoreError::Protocol(format!("invalid JSON: {e}")))?;
        decode_response(body)
    }
}

pub(crate) fn request_body(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

pub(crate) fn decode_response<T: DeserializeOwned>(mut body: Value) -> StoreResult<T> {
    if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(StoreError::Rpc { code, message });
    }
    let result = body
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| StoreError::Protocol("response has neither result nor error".into()))?;
    Ok(serde_json::from_value(result)?)
}

/// Provider-linking names understood by the IPC server.
pub(crate) fn provider_linking_param(linking: ProviderLinking) -> &'static str {
    match linking {
        ProviderLinking::Prefer => "prefer",
        ProviderLinking::Always => "only",
        ProviderLinking::Ignore => "ignore",
    }
}

pub(crate) fn product_system_params(root_process_id: &str, options: &LinkingOptions) -> Value {
    json!({
        "processId": root_process_id,
        "preferredType": options.preferred_type,
        "providerLinking": provider_linking_param(options.default_providers),
    })
}

impl ModelStore for IpcClient {
    fn get_descriptors(&mut self, model_type: ModelType) -> StoreResult<Vec<Ref>> {
        self.call("get/descriptors", json!({ "@type": model_type }))
    }

    fn get_process(&mut self, id: &str) -> StoreResult<Process> {
        self.call("get", json!({ "@type": ModelType::Process, "@id": id }))
    }

    fn insert_flow(&mut self, flow: &Flow) -> StoreResult<Ref> {
        self.call("insert", serde_json::to_value(flow)?)
    }

    fn insert_process(&mut self, process: &Process) -> StoreResult<Ref> {
        self.call("insert", serde_json::to_value(process)?)
    }

    fn update_process(&mut self, process: &Process) -> StoreResult<Ref> {
        self.call("update", serde_json::to_value(process)?)
    }

    fn create_product_system(
        &mut self,
        root_process_id: &str,
        options: &LinkingOptions,
    ) -> StoreResult<Ref> {
        self.call(
            "create/product_system",
            product_system_params(root_process_id, options),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lca_core::ProcessType;

    #[test]
    fn request_is_json_rpc_2() {
        let body = request_body(7, "get/descriptors", json!({"@type": ModelType::Flow}));
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["id"], 7);
        assert_eq!(body["method"], "get/descriptors");
        assert_eq!(body["params"]["@type"], "Flow");
    }

    #[test]
    fn process_dataset_is_decoded() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 3,
            "result": {
                "@type": "Process",
                "@id": "p-1",
                "name": "Sand",
                "description": "ecoinvent dataset",
                "processType": "LCI_RESULT",
                "exchanges": []
            }
        });
        let process: Process = decode_response(body).unwrap();
        assert_eq!(process.process_type, ProcessType::SystemProcess);
        assert_eq!(process.description, "ecoinvent dataset");
    }

    #[test]
    fn result_is_decoded() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [{"@type": "FlowProperty", "@id": "abc", "name": "Mass"}]
        });
        let refs: Vec<Ref> = decode_response(body).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "Mass");
        assert_eq!(refs[0].model_type, ModelType::FlowProperty);
    }

    #[test]
    fn error_is_surfaced() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 501, "message": "Invalid @type"}
        });
        let err = decode_response::<Ref>(body).unwrap_err();
        match err {
            StoreError::Rpc { code, message } => {
                assert_eq!(code, 501);
                assert_eq!(message, "Invalid @type");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_result_is_protocol_error() {
        let err = decode_response::<Ref>(json!({"jsonrpc": "2.0", "id": 1})).unwrap_err();
        assert!(matches!(err, StoreError::Protocol(_)));
    }

    #[test]
    fn product_system_params_follow_server_names() {
        let opts = LinkingOptions {
            default_providers: ProviderLinking::Always,
            preferred_type: ProcessType::UnitProcess,
        };
        let v = product_system_params("p-1", &opts);
        assert_eq!(v["processId"], "p-1");
        assert_eq!(v["preferredType"], "UNIT_PROCESS");
        assert_eq!(v["providerLinking"], "only");
    }

    #[test]
    fn connect_builds_endpoint() {
        let client = IpcClient::connect("localhost", 8080, Some(Duration::from_secs(5))).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080");
    }
}
