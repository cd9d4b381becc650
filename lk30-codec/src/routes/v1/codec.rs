use std::collections::HashMap;

use axum::{Router, response::IntoResponse, routing};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sylvia_iot_sdk::util::{err::ErrResp, http::Json};

use crate::libs::{
    downlink::{self, EncodeInput},
    uplink::{self, DecodeInput, UplinkData},
};

#[derive(Deserialize)]
struct PostUplinkReq {
    data: PostUplink,
}

#[derive(Deserialize)]
struct PostUplink {
    payload: String,
    #[serde(rename = "fPort", default)]
    f_port: u8,
    #[serde(default)]
    variables: HashMap<String, String>,
}

#[derive(Serialize)]
struct PostUplinkRes {
    data: UplinkData,
}

#[derive(Serialize)]
struct PostDownlinkRes {
    data: PostDownlinkResData,
}

#[derive(Serialize)]
struct PostDownlinkResData {
    payload: String,
}

pub fn new_service(scope_path: &str) -> Router {
    Router::new().nest(
        scope_path,
        Router::new()
            .route("/uplink", routing::post(post_uplink))
            .route("/downlink", routing::post(post_downlink)),
    )
}

/// `POST /{base}/api/v1/codec/uplink`
async fn post_uplink(Json(body): Json<PostUplinkReq>) -> impl IntoResponse {
    const FN_NAME: &'static str = "post_uplink";

    let bytes = match hex::decode(body.data.payload.as_str()) {
        Err(e) => {
            warn!("[{}] invalid payload {}: {}", FN_NAME, body.data.payload, e);
            return Err(ErrResp::ErrParam(Some(format!(
                "`payload` is not hexadecimal string: {}",
                e
            ))));
        }
        Ok(bytes) => bytes,
    };
    let input = DecodeInput {
        bytes,
        f_port: body.data.f_port,
        variables: body.data.variables,
    };

    match uplink::decode_input(&input) {
        Err(e) => {
            warn!("[{}] decode {} error: {}", FN_NAME, body.data.payload, e);
            Err(ErrResp::ErrParam(Some(e.to_string())))
        }
        Ok(output) => {
            debug!("[{}] decode {}: {:?}", FN_NAME, body.data.payload, output.data);
            Ok(Json(PostUplinkRes { data: output.data }))
        }
    }
}

/// `POST /{base}/api/v1/codec/downlink`
async fn post_downlink(Json(body): Json<EncodeInput>) -> impl IntoResponse {
    const FN_NAME: &'static str = "post_downlink";

    match downlink::encode_input(&body) {
        Err(e) => {
            warn!("[{}] encode {:?} error: {}", FN_NAME, body.data, e);
            Err(ErrResp::ErrParam(Some(e.to_string())))
        }
        Ok(output) => {
            let payload = hex::encode(&output.bytes);
            debug!("[{}] encode {:?}: {}", FN_NAME, body.data, payload);
            Ok(Json(PostDownlinkRes {
                data: PostDownlinkResData { payload },
            }))
        }
    }
}
