#![cfg(not(tarpaulin_include))]

use ethers::prelude::abigen;

abigen!(
    DataMarketplace,
    r#"[
  {
    "inputs": [
      { "internalType": "address", "name": "newAIAgent", "type": "address" }
    ],
    "stateMutability": "nonpayable",
    "type": "constructor"
  },
  {
    "inputs": [],
    "name": "DataMarketplace__NotAIAgent",
    "type": "error"
  },
  {
    "anonymous": false,
    "inputs": [
      { "indexed": true, "internalType": "uint32", "name": "dataIndex", "type": "uint32" },
      {
        "components": [
          { "internalType": "string", "name": "description", "type": "string" },
          { "internalType": "address", "name": "user", "type": "address" }
        ],
        "indexed": false,
        "internalType": "struct DataMarketplace.Data",
        "name": "data",
        "type": "tuple"
      },
      { "indexed": false, "internalType": "address", "name": "aiAgent", "type": "address" },
      { "indexed": false, "internalType": "bool", "name": "isValid", "type": "bool" }
    ],
    "name": "AIAgentResponded",
    "type": "event"
  },
  {
    "anonymous": false,
    "inputs": [
      { "indexed": true, "internalType": "uint32", "name": "dataIndex", "type": "uint32" },
      {
        "components": [
          { "internalType": "string", "name": "description", "type": "string" },
          { "internalType": "address", "name": "user", "type": "address" }
        ],
        "indexed": false,
        "internalType": "struct DataMarketplace.Data",
        "name": "data",
        "type": "tuple"
      }
    ],
    "name": "NewDataCreated",
    "type": "event"
  },
  {
    "inputs": [],
    "name": "aiAgent",
    "outputs": [
      { "internalType": "address", "name": "", "type": "address" }
    ],
    "stateMutability": "view",
    "type": "function"
  },
  {
    "inputs": [
      { "internalType": "uint256", "name": "", "type": "uint256" }
    ],
    "name": "aiTrainingData",
    "outputs": [
      { "internalType": "string", "name": "description", "type": "string" },
      { "internalType": "address", "name": "user", "type": "address" }
    ],
    "stateMutability": "view",
    "type": "function"
  },
  {
    "inputs": [
      { "internalType": "string", "name": "description", "type": "string" }
    ],
    "name": "createNewData",
    "outputs": [
      {
        "components": [
          { "internalType": "string", "name": "description", "type": "string" },
          { "internalType": "address", "name": "user", "type": "address" }
        ],
        "internalType": "struct DataMarketplace.Data",
        "name": "",
        "type": "tuple"
      }
    ],
    "stateMutability": "nonpayable",
    "type": "function"
  },
  {
    "inputs": [],
    "name": "latestDataNum",
    "outputs": [
      { "internalType": "uint32", "name": "", "type": "uint32" }
    ],
    "stateMutability": "view",
    "type": "function"
  },
  {
    "inputs": [
      {
        "components": [
          { "internalType": "string", "name": "description", "type": "string" },
          { "internalType": "address", "name": "user", "type": "address" }
        ],
        "internalType": "struct DataMarketplace.Data",
        "name": "data",
        "type": "tuple"
      },
      { "internalType": "uint32", "name": "referenceDataIndex", "type": "uint32" },
      { "internalType": "bool", "name": "isValid", "type": "bool" }
    ],
    "name": "respondToNewData",
    "outputs": [],
    "stateMutability": "nonpayable",
    "type": "function"
  }
]"#,
);
