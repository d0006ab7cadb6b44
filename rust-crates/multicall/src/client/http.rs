use crate::{
    call::{
        Address,
        CallFailure,
        CallOutcome,
        CallParam,
        CallRequest,
        CallValue,
        MutationReceipt,
        MutationRequest,
    },
    client::{
        ChainRead,
        ChainWrite,
    },
};
use anyhow::{
    Context,
    anyhow,
};
use reqwest::StatusCode;
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

/// HTTP read/write gateway. Batched reads are posted as one JSON payload
/// and evaluated server-side in a single chain round trip; the response
/// carries one outcome per call, in call order.
#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> crate::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client for chain gateway")?;
        Ok(Self { base_url, http })
    }
}

impl ChainRead for HttpGateway {
    async fn read_batch(
        &self,
        calls: &[CallRequest],
    ) -> crate::Result<Vec<CallOutcome>> {
        let url = format!("{}/read/batch", self.base_url);
        tracing::debug!(calls = calls.len(), "executing batched read");
        let payload: Vec<CallRequestDto> = calls.iter().map(Into::into).collect();
        let res = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .context("gateway batch request failed")?;
        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable body>".to_string());
            return Err(anyhow!(
                "gateway responded with {status} when executing batch: {body}"
            ));
        }
        let dtos: Vec<CallOutcomeDto> = res
            .json()
            .await
            .context("invalid gateway batch payload")?;
        if dtos.len() != calls.len() {
            return Err(anyhow!(
                "gateway returned {} outcomes for {} calls",
                dtos.len(),
                calls.len()
            ));
        }
        dtos.into_iter().map(CallOutcome::try_from).collect()
    }
}

impl ChainWrite for HttpGateway {
    async fn submit(
        &self,
        mutation: &MutationRequest,
    ) -> crate::Result<MutationReceipt> {
        let url = format!("{}/write", self.base_url);
        let res = self
            .http
            .post(url)
            .json(&MutationRequestDto::from(mutation))
            .send()
            .await
            .context("gateway mutation request failed")?;
        let status = res.status();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            // The gateway mined the transaction but it reverted; surface
            // that as a failed receipt rather than a transport error.
            let dto: ReceiptDto = res
                .json()
                .await
                .context("invalid gateway revert payload")?;
            return Ok(dto.into());
        }
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable body>".to_string());
            return Err(anyhow!(
                "gateway responded with {status} when submitting {}: {body}",
                mutation.method
            ));
        }
        let dto: ReceiptDto = res
            .json()
            .await
            .context("invalid gateway receipt payload")?;
        Ok(dto.into())
    }
}

impl fmt::Display for HttpGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url)
    }
}

#[derive(Serialize)]
struct CallRequestDto {
    address: String,
    method: String,
    params: Vec<ParamDto>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum ParamDto {
    Uint(String),
    Bool(bool),
    Address(String),
    Str(String),
}

#[derive(Serialize)]
struct MutationRequestDto {
    address: String,
    method: String,
    params: Vec<ParamDto>,
    value: String,
}

#[derive(Deserialize)]
struct CallOutcomeDto {
    #[serde(default)]
    value: Option<ValueDto>,
    #[serde(default)]
    error: Option<String>,
}

// Uints travel as decimal strings; JSON numbers cannot carry a full
// 256-bit word and several gateways already quote them.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ValueDto {
    Uint(String),
    Bool(bool),
    Address(String),
    Str(String),
    List(Vec<ValueDto>),
    Tuple(Vec<ValueDto>),
}

#[derive(Deserialize)]
struct ReceiptDto {
    status: bool,
    tx_hash: String,
}

impl From<&CallRequest> for CallRequestDto {
    fn from(call: &CallRequest) -> Self {
        CallRequestDto {
            address: call.address.to_string(),
            method: call.method.clone(),
            params: call.params.iter().map(Into::into).collect(),
        }
    }
}

impl From<&CallParam> for ParamDto {
    fn from(param: &CallParam) -> Self {
        match param {
            CallParam::Uint(n) => ParamDto::Uint(n.to_string()),
            CallParam::Bool(b) => ParamDto::Bool(*b),
            CallParam::Address(address) => ParamDto::Address(address.to_string()),
            CallParam::Str(s) => ParamDto::Str(s.clone()),
        }
    }
}

impl From<&MutationRequest> for MutationRequestDto {
    fn from(mutation: &MutationRequest) -> Self {
        MutationRequestDto {
            address: mutation.address.to_string(),
            method: mutation.method.clone(),
            params: mutation.params.iter().map(Into::into).collect(),
            value: mutation.value.to_string(),
        }
    }
}

impl TryFrom<ValueDto> for CallValue {
    type Error = anyhow::Error;

    fn try_from(dto: ValueDto) -> Result<Self, Self::Error> {
        let value = match dto {
            ValueDto::Uint(raw) => CallValue::Uint(
                raw.parse::<u128>()
                    .map_err(|e| anyhow!("invalid uint '{raw}': {e}"))?,
            ),
            ValueDto::Bool(b) => CallValue::Bool(b),
            ValueDto::Address(raw) => CallValue::Address(raw.parse::<Address>()?),
            ValueDto::Str(s) => CallValue::Str(s),
            ValueDto::List(items) => CallValue::List(
                items
                    .into_iter()
                    .map(CallValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            ValueDto::Tuple(fields) => CallValue::Tuple(
                fields
                    .into_iter()
                    .map(CallValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(value)
    }
}

impl TryFrom<CallOutcomeDto> for CallOutcome {
    type Error = anyhow::Error;

    fn try_from(dto: CallOutcomeDto) -> Result<Self, Self::Error> {
        match (dto.value, dto.error) {
            (Some(value), None) => Ok(Ok(CallValue::try_from(value)?)),
            (None, Some(message)) => Ok(Err(CallFailure::new(message))),
            (Some(_), Some(message)) => Ok(Err(CallFailure::new(message))),
            (None, None) => {
                Err(anyhow!("gateway outcome carried neither value nor error"))
            }
        }
    }
}

impl From<ReceiptDto> for MutationReceipt {
    fn from(dto: ReceiptDto) -> Self {
        MutationReceipt {
            status: dto.status,
            tx_hash: dto.tx_hash,
        }
    }
}
