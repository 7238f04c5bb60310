/*
 * Responsibility
 * - Decision → CheckResponse (wire) への機械的な変換
 * - ポリシーの再評価はしない
 */
use super::proto::{
    CheckResponse, DeniedHttpResponse, OkHttpResponse, check_response::HttpResponse,
    core::{HeaderValue, HeaderValueOption}, r#type::HttpStatus, rpc,
};
use crate::services::authz::Decision;

impl From<Decision> for CheckResponse {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow { attachments } => {
                let headers = attachments
                    .into_iter()
                    .map(|(key, value)| HeaderValueOption {
                        header: Some(HeaderValue {
                            key,
                            value,
                            raw_value: Vec::new(),
                        }),
                    })
                    .collect();

                CheckResponse {
                    status: Some(rpc::Status {
                        code: tonic::Code::Ok as i32,
                        message: String::new(),
                    }),
                    http_response: Some(HttpResponse::OkResponse(OkHttpResponse { headers })),
                }
            }
            Decision::Deny { status_code, body } => CheckResponse {
                status: Some(rpc::Status {
                    code: grpc_code_for(status_code) as i32,
                    message: String::new(),
                }),
                http_response: Some(HttpResponse::DeniedResponse(DeniedHttpResponse {
                    status: Some(HttpStatus {
                        code: i32::from(status_code),
                    }),
                    headers: Vec::new(),
                    body: body.to_string(),
                })),
            },
        }
    }
}

// Keeps the protocol-level status in agreement with the HTTP one.
fn grpc_code_for(http_status: u16) -> tonic::Code {
    match http_status {
        401 => tonic::Code::Unauthenticated,
        403 => tonic::Code::PermissionDenied,
        _ => tonic::Code::Unknown,
    }
}
