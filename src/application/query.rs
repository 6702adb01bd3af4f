use super::ledger::{LedgerError, SealLedger};
use crate::domain::{normalize_fingerprint, DisclosedRecord, SealedRecord};

/// Read paths. None of these hide locked content; callers that display
/// records should use the `view_*` variants, which disclose content only
/// after release.
impl SealLedger {
    /// Look up a record. A malformed fingerprint simply finds nothing.
    pub fn get(&self, fingerprint: &str) -> Result<Option<SealedRecord>, LedgerError> {
        match normalize_fingerprint(fingerprint) {
            Some(fp) => Ok(self.store().find_by_fingerprint(&fp)?),
            None => Ok(None),
        }
    }

    pub fn list_by_signer(&self, signer: &str) -> Result<Vec<SealedRecord>, LedgerError> {
        let signer = signer.trim();
        if signer.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store().find_by_signer(signer)?)
    }

    pub fn list_recent(&self, limit: usize) -> Result<Vec<SealedRecord>, LedgerError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.store().recent(limit)?)
    }

    pub fn view_record(&self, fingerprint: &str) -> Result<Option<DisclosedRecord>, LedgerError> {
        let now = self.now();
        Ok(self.get(fingerprint)?.map(|record| record.disclose(now)))
    }

    pub fn view_signer(&self, signer: &str) -> Result<Vec<DisclosedRecord>, LedgerError> {
        let now = self.now();
        Ok(self
            .list_by_signer(signer)?
            .iter()
            .map(|record| record.disclose(now))
            .collect())
    }

    pub fn view_recent(&self, limit: usize) -> Result<Vec<DisclosedRecord>, LedgerError> {
        let now = self.now();
        Ok(self
            .list_recent(limit)?
            .iter()
            .map(|record| record.disclose(now))
            .collect())
    }
}
