// In-memory fleet backend for tests
use crate::application::fleet_repository::FleetRepository;
use crate::domain::device::{
    parse_live_payload, DeviceListPayload, LiveRecord, RegistrationReceipt, StatusReport,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

type Canned = Result<Value, &'static str>;

/// Serves canned JSON responses. Unset responses are empty successes.
#[derive(Default)]
pub struct FakeRepository {
    live: Mutex<VecDeque<Canned>>,
    device_list: Mutex<Option<Canned>>,
    status: Mutex<Option<Canned>>,
    registration: Mutex<Option<Canned>>,
    submitted: Mutex<Vec<BTreeMap<String, String>>>,
    live_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl FakeRepository {
    pub fn push_live(&self, response: Canned) {
        self.live.lock().unwrap().push_back(response);
    }

    pub fn set_device_list(&self, response: Canned) {
        *self.device_list.lock().unwrap() = Some(response);
    }

    pub fn set_status(&self, response: Canned) {
        *self.status.lock().unwrap() = Some(response);
    }

    pub fn set_registration(&self, response: Canned) {
        *self.registration.lock().unwrap() = Some(response);
    }

    pub fn submitted(&self) -> Vec<BTreeMap<String, String>> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn live_calls(&self) -> usize {
        self.live_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

fn answer<T: DeserializeOwned + Default>(canned: Option<Canned>) -> anyhow::Result<T> {
    match canned {
        None => Ok(T::default()),
        Some(Ok(value)) => Ok(serde_json::from_value(value)?),
        Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
    }
}

#[async_trait]
impl FleetRepository for FakeRepository {
    async fn fetch_device_list(&self) -> anyhow::Result<DeviceListPayload> {
        answer(self.device_list.lock().unwrap().clone())
    }

    async fn fetch_live_data(&self) -> anyhow::Result<Vec<LiveRecord>> {
        self.live_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.live.lock().unwrap().pop_front();
        answer::<Value>(next).map(parse_live_payload)
    }

    async fn fetch_device_status(&self) -> anyhow::Result<StatusReport> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        answer(self.status.lock().unwrap().clone())
    }

    async fn submit_registration(
        &self,
        fields: &BTreeMap<String, String>,
    ) -> anyhow::Result<RegistrationReceipt> {
        self.submitted.lock().unwrap().push(fields.clone());
        answer(self.registration.lock().unwrap().clone())
    }
}
