use crate::service::SignatureClient;

pub struct GatewayState {
    pub client: SignatureClient,
}

impl GatewayState {
    pub fn new(client: SignatureClient) -> Self {
        Self { client }
    }
}
