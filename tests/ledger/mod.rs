mod ledger_test;
mod mock_store;
