use anchor_lang::prelude::*;

use crate::errors::OptimizerError;
use crate::events::{DeviceRegistered, DeviceStatusChanged};
use crate::{RegisterDevice, SetDeviceActive};

pub fn register_device(ctx: Context<RegisterDevice>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, OptimizerError::Paused);

    let owner = ctx.accounts.owner.key();
    let slot = Clock::get()?.slot;

    let registry = &mut ctx.accounts.participant_registry;
    registry.register(owner, slot)?;

    emit!(DeviceRegistered {
        owner,
        slot,
        registered_count: registry.devices.len() as u64,
    });
    Ok(())
}

/// Deactivated devices are left out of future snapshots only.
pub fn set_device_active(ctx: Context<SetDeviceActive>, device: Pubkey, active: bool) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, OptimizerError::Paused);

    let authority = ctx.accounts.authority.key();
    require!(
        authority == device || authority == cfg.admin,
        OptimizerError::Unauthorized
    );

    let slot = Clock::get()?.slot;
    ctx.accounts
        .participant_registry
        .set_active(&device, active, slot)?;

    emit!(DeviceStatusChanged {
        owner: device,
        active,
        slot,
    });
    Ok(())
}
