use std::collections::HashSet;
use std::sync::Arc;
use super::error::ApplicationError;
use super::upload::UploadedFile;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::domain::encode_request::EncodeRequest;
use crate::domain::encode_result::EncodeResult;
use crate::domain::error::EncodeFailure;
use crate::domain::image_codec_trait::{ImageDecoder, LossyEncoder};
use crate::domain::size_targeted_encoder;
use crate::infrastructure::archive::{build_zip, ArchiveEntry};
use crate::infrastructure::error::InfrastructureError;

pub const SINGLE_DOWNLOAD_PREFIX: &str = "pixelshrink_";
pub const ARCHIVE_DOWNLOAD_NAME: &str = "pixelshrink_images.zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrunkImage {
    pub download_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub quality: u8,
    pub met_target: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedExtension,
    Undecodable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedImage {
    pub entry_name: String,
    pub quality: u8,
    pub met_target: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrunkArchive {
    pub download_name: &'static str,
    pub bytes: Vec<u8>,
    pub entries: Vec<ArchivedImage>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShrinkOutcome {
    Single(ShrunkImage),
    Archive(ShrunkArchive),
}

pub struct ShrinkService {
    decoder: Arc<dyn ImageDecoder + Send + Sync>,
    encoder: Arc<dyn LossyEncoder + Send + Sync>,
    allowed_extensions: Vec<String>,
}

impl ShrinkService {
    pub fn new(
        decoder: Arc<dyn ImageDecoder + Send + Sync>,
        encoder: Arc<dyn LossyEncoder + Send + Sync>,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            decoder,
            encoder,
            allowed_extensions,
        }
    }

    /// One file in, one image out; several files in, one archive out.
    pub async fn shrink(
        &self,
        files: Vec<UploadedFile>,
        request: EncodeRequest,
    ) -> Result<ShrinkOutcome, ApplicationError> {
        match files.len() {
            0 => Err(ApplicationError::NoFileSelected),
            1 if files[0].file_name.is_empty() => Err(ApplicationError::NoFileSelected),
            1 => {
                let file = files.into_iter().next().ok_or(ApplicationError::NoFileSelected)?;
                self.shrink_single(file, request).await.map(ShrinkOutcome::Single)
            }
            _ => self.shrink_batch(files, request).await.map(ShrinkOutcome::Archive),
        }
    }

    pub async fn shrink_single(
        &self,
        file: UploadedFile,
        request: EncodeRequest,
    ) -> Result<ShrunkImage, ApplicationError> {
        request.validate()?;
        if !file.is_allowed(&self.allowed_extensions) {
            return Err(ApplicationError::UnsupportedFile {
                file_name: file.safe_name(),
            });
        }
        let stem = file.output_stem();
        let result = self.encode_blocking(file.data, request).await??;
        info!(
            file = %stem,
            quality = result.quality,
            size = result.size(),
            met_target = result.met_target,
            "image shrunk"
        );

        Ok(ShrunkImage {
            download_name: format!("{}{}.{}", SINGLE_DOWNLOAD_PREFIX, stem, self.encoder.extension()),
            content_type: self.encoder.content_type(),
            bytes: result.buffer,
            quality: result.quality,
            met_target: result.met_target,
        })
    }

    /// Encodes every acceptable file concurrently and zips the results.
    ///
    /// Files with a disallowed extension or undecodable content are skipped
    /// and reported. A batch with nothing left to archive is an error.
    pub async fn shrink_batch(
        &self,
        files: Vec<UploadedFile>,
        request: EncodeRequest,
    ) -> Result<ShrunkArchive, ApplicationError> {
        // パラメータ不正はファイル単位ではなくバッチ全体のエラー
        request.validate()?;

        let mut skipped = Vec::new();
        let mut accepted = Vec::new();
        let mut tasks: JoinSet<(usize, Result<EncodeResult, EncodeFailure>)> = JoinSet::new();
        for file in files {
            if !file.is_allowed(&self.allowed_extensions) {
                warn!(file = %file.file_name, "skipping file with unsupported extension");
                skipped.push(SkippedFile {
                    file_name: file.safe_name(),
                    reason: SkipReason::UnsupportedExtension,
                });
                continue;
            }
            let index = accepted.len();
            accepted.push((file.safe_name(), file.output_stem()));
            let job = self.encode_job(file.data, request);
            tasks.spawn_blocking(move || (index, job()));
        }

        // 早期リターンで JoinSet が落ちると、未開始のエンコードは中止される
        let mut results: Vec<Option<Result<EncodeResult, EncodeFailure>>> =
            accepted.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(InfrastructureError::from)?;
            match result {
                Err(failure) if !matches!(failure, EncodeFailure::Decode(_)) => return Err(failure.into()),
                result => results[index] = Some(result),
            }
        }

        let mut used_names = HashSet::new();
        let mut archive_entries = Vec::new();
        let mut entries = Vec::new();
        for (slot, (safe_name, stem)) in results.into_iter().zip(accepted) {
            let Some(joined) = slot else { continue };
            let result = match joined {
                Ok(result) => result,
                Err(EncodeFailure::Decode(reason)) => {
                    warn!(file = %safe_name, %reason, "skipping undecodable file");
                    skipped.push(SkippedFile {
                        file_name: safe_name,
                        reason: SkipReason::Undecodable(reason),
                    });
                    continue;
                }
                Err(other) => return Err(other.into()),
            };

            let entry_name = unique_entry_name(&stem, self.encoder.extension(), &mut used_names);
            info!(
                file = %entry_name,
                quality = result.quality,
                size = result.size(),
                met_target = result.met_target,
                "image shrunk"
            );
            entries.push(ArchivedImage {
                entry_name: entry_name.clone(),
                quality: result.quality,
                met_target: result.met_target,
            });
            archive_entries.push(ArchiveEntry {
                name: entry_name,
                data: result.buffer,
            });
        }

        if archive_entries.is_empty() {
            return Err(ApplicationError::NoValidFiles {
                skipped: skipped.into_iter().map(|s| s.file_name).collect(),
            });
        }

        let bytes = build_zip(&archive_entries)?;
        Ok(ShrunkArchive {
            download_name: ARCHIVE_DOWNLOAD_NAME,
            bytes,
            entries,
            skipped,
        })
    }

    async fn encode_blocking(
        &self,
        data: Vec<u8>,
        request: EncodeRequest,
    ) -> Result<Result<EncodeResult, EncodeFailure>, InfrastructureError> {
        Ok(tokio::task::spawn_blocking(self.encode_job(data, request)).await?)
    }

    // CPU バウンドなのでブロッキングスレッドで実行する
    fn encode_job(
        &self,
        data: Vec<u8>,
        request: EncodeRequest,
    ) -> impl FnOnce() -> Result<EncodeResult, EncodeFailure> + Send + 'static {
        let decoder = Arc::clone(&self.decoder);
        let encoder = Arc::clone(&self.encoder);
        move || {
            let image = decoder.decode(&data)?;
            size_targeted_encoder::encode(encoder.as_ref(), &image, &request)
        }
    }
}

fn unique_entry_name(stem: &str, extension: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = format!("{}.{}", stem, extension);
    let mut suffix = 1;
    while used.contains(&candidate) {
        candidate = format!("{}_{}.{}", stem, suffix, extension);
        suffix += 1;
    }
    used.insert(candidate.clone());
    candidate
}
