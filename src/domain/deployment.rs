use ethers::types::Address;
use serde::Serialize;
use serde_json::{json, Map, Value};

pub const DEFAULT_MODULE: &str = "DataMarketplaceModule";
pub const DEFAULT_CONTRACT: &str = "DataMarketplace";

/// How the marketplace contract gets instantiated by the external deployment tool.
///
/// The constructor argument is the AI agent address. It is unrelated to the
/// address the client later calls, and nothing here assumes the two agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentDescriptor {
    pub module: String,
    pub contract: String,
    pub ai_agent: Address,
}

impl DeploymentDescriptor {
    pub fn new(ai_agent: Address) -> Self {
        Self {
            module: DEFAULT_MODULE.to_string(),
            contract: DEFAULT_CONTRACT.to_string(),
            ai_agent,
        }
    }

    /// Hardhat Ignition parameters file content for this module, shaped
    /// `{ "<module>": { "newAIAgent": "0x..." } }`.
    ///
    /// Only modules that read the argument with `m.getParameter("newAIAgent")`
    /// pick it up; a module that hard-codes the constructor argument ignores
    /// this file. `contract` names what the module deploys and is not a
    /// parameter, so it is not emitted.
    pub fn ignition_parameters(&self) -> Value {
        let mut root = Map::new();
        root.insert(
            self.module.clone(),
            json!({ "newAIAgent": format!("{:?}", self.ai_agent) }),
        );
        Value::Object(root)
    }
}
